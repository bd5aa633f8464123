// src/share.rs
//! Outbound social-share URLs and mailto:/tel: contact links

use crate::types::job_posting::JobPosting;
use serde::Serialize;
use url::form_urlencoded::byte_serialize;

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect::<String>().replace('+', "%20")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinks {
    pub page_url: String,
    pub linkedin: String,
    pub twitter: String,
    pub facebook: String,
    pub email: String,
}

/// Public page URL of a posting.
pub fn job_url(base_url: &str, job_id: u32) -> String {
    format!("{}/jobs/{}", base_url.trim_end_matches('/'), job_id)
}

pub fn share_links(page_url: &str, title: &str) -> ShareLinks {
    let url = encode(page_url);
    let text = encode(title);
    ShareLinks {
        page_url: page_url.to_string(),
        linkedin: format!("https://www.linkedin.com/sharing/share-offsite/?url={}", url),
        twitter: format!("https://twitter.com/intent/tweet?url={}&text={}", url, text),
        facebook: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
        email: format!(
            "mailto:?subject={}&body={}",
            text,
            encode(&format!("Check out this job: {}", page_url))
        ),
    }
}

pub fn job_share_links(base_url: &str, job: &JobPosting) -> ShareLinks {
    share_links(&job_url(base_url, job.id), &job.title)
}

pub fn mailto(address: &str) -> String {
    format!("mailto:{}", address.trim())
}

/// `tel:` link keeping digits and a leading plus sign.
pub fn tel(number: &str) -> String {
    let number = number.trim();
    let mut digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    if number.starts_with('+') {
        digits.insert(0, '+');
    }
    format!("tel:{}", digits)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactLinks {
    pub email: String,
    pub phone: String,
    pub mailto: String,
    pub tel: String,
}

pub fn contact_links(email: &str, phone: &str) -> ContactLinks {
    ContactLinks {
        email: email.to_string(),
        phone: phone.to_string(),
        mailto: mailto(email),
        tel: tel(phone),
    }
}
