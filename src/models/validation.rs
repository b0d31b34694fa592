use anyhow::{Result, anyhow};
use reqwest::Url;

pub fn validate_email(address: &str) -> Result<()> {
    if address.is_empty() {
        return Err(anyhow!("Email address cannot be empty"));
    }

    if address.len() > 254 {
        return Err(anyhow!("Email address too long (maximum 254 characters)"));
    }

    if address.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(anyhow!("Email address contains whitespace"));
    }

    let (local, domain) = address
        .rsplit_once('@')
        .ok_or_else(|| anyhow!("Email address must contain '@'"))?;

    if local.is_empty() || local.len() > 64 || local.contains('@') {
        return Err(anyhow!("Email address has an invalid local part"));
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return Err(anyhow!("Email domain must contain a dot"));
    }

    let valid_labels = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });

    if !valid_labels {
        return Err(anyhow!("Email address has an invalid domain"));
    }

    Ok(())
}

pub fn validate_phone(number: &str) -> Result<()> {
    normalize_phone(number).map(|_| ())
}

/// Validates a phone number and returns its compact form: an optional leading
/// `+` followed by digits only.
pub fn normalize_phone(number: &str) -> Result<String> {
    if number.trim().is_empty() {
        return Err(anyhow!("Phone number cannot be empty"));
    }

    let compact: String = number
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();

    let digits = compact.strip_prefix('+').unwrap_or(&compact);

    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Phone number contains invalid characters"));
    }

    if digits.len() < 7 {
        return Err(anyhow!("Phone number too short (minimum 7 digits)"));
    }

    if digits.len() > 15 {
        return Err(anyhow!("Phone number too long (maximum 15 digits)"));
    }

    Ok(compact)
}

pub fn validate_review_link(link: &str) -> Result<()> {
    let url = Url::parse(link).map_err(|e| anyhow!("Link is not an absolute URL: {}", e))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(anyhow!("Link must use http or https, got '{}'", url.scheme()));
    }

    if url.host_str().is_none_or(|h| h.is_empty()) {
        return Err(anyhow!("Link must include a host"));
    }

    Ok(())
}

pub fn validate_rating(rating: i64) -> Result<u8> {
    if !(1..=5).contains(&rating) {
        return Err(anyhow!("Rating must be between 1 and 5, got {}", rating));
    }

    Ok(rating as u8)
}
