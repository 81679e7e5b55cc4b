//! Local payload validation
//!
//! Runs before any request is issued so malformed forms never reach the
//! backend.

use crate::error::{Error, Result};
use crate::models::{ProductDraft, ProductPatch};

pub const NAME_MAX_LEN: usize = 255;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const IMAGE_URL_MAX_LEN: usize = 512;

/// Validate a create payload
pub fn validate_draft(draft: &ProductDraft) -> Result<()> {
    check_name(&draft.name)?;
    if let Some(description) = draft.description.as_deref() {
        check_description(description)?;
    }
    check_price(draft.price)?;
    check_quantity(draft.quantity)?;
    if let Some(url) = draft.image_url.as_deref() {
        check_image_url(url)?;
    }
    Ok(())
}

/// Validate a partial update payload
pub fn validate_patch(patch: &ProductPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(Error::Validation("Update contains no fields".into()));
    }
    if let Some(name) = patch.name.as_deref() {
        check_name(name)?;
    }
    if let Some(Some(description)) = patch.description.as_ref() {
        check_description(description)?;
    }
    if let Some(price) = patch.price {
        check_price(price)?;
    }
    if let Some(quantity) = patch.quantity {
        check_quantity(quantity)?;
    }
    if let Some(Some(url)) = patch.image_url.as_ref() {
        check_image_url(url)?;
    }
    Ok(())
}

/// Validate login/registration input
pub fn validate_credentials(identity: &str, secret: &str) -> Result<()> {
    if identity.trim().is_empty() {
        return Err(Error::Validation("Email is required".into()));
    }
    if secret.is_empty() {
        return Err(Error::Validation("Password is required".into()));
    }
    Ok(())
}

fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("Name is required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(Error::Validation(format!(
            "Name must be at most {} characters",
            NAME_MAX_LEN
        )));
    }
    Ok(())
}

fn check_description(description: &str) -> Result<()> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(Error::Validation(format!(
            "Description must be at most {} characters",
            DESCRIPTION_MAX_LEN
        )));
    }
    Ok(())
}

fn check_price(price: f64) -> Result<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(Error::Validation("Price must be >= 0".into()));
    }
    Ok(())
}

fn check_quantity(quantity: i64) -> Result<()> {
    if quantity < 0 {
        return Err(Error::Validation("Quantity must be >= 0".into()));
    }
    Ok(())
}

fn check_image_url(url: &str) -> Result<()> {
    if url.len() > IMAGE_URL_MAX_LEN {
        return Err(Error::Validation(format!(
            "Image URL must be at most {} characters",
            IMAGE_URL_MAX_LEN
        )));
    }
    if !is_well_formed_url(url) {
        return Err(Error::Validation(format!("Invalid URL '{}'", url)));
    }
    Ok(())
}

/// Check for an absolute `http(s)://host[:port][/path]` with no whitespace
pub fn is_well_formed_url(url: &str) -> bool {
    if url.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return false;
    }

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);

    // Bracketed IPv6 hosts carry colons of their own
    let (host, port) = if let Some(stripped) = host_port.strip_prefix('[') {
        match stripped.split_once(']') {
            Some((host, tail)) => (host, tail.strip_prefix(':')),
            None => return false,
        }
    } else {
        match host_port.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    if host.is_empty() {
        return false;
    }
    match port {
        Some(port) => port.parse::<u16>().is_ok(),
        None => true,
    }
}
