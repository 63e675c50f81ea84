//! Fixed reply texts and reply formatting.

use intake_core::{escape_html, Reply};

pub const ALREADY_REGISTERED: &str = "Welcome back! You're already registered.";
pub const SHARE_CONTACT_PROMPT: &str =
    "Hi there! Please share your phone number to complete registration.";
pub const REGISTER_FIRST: &str = "Please send /start to register before sharing your contact.";
pub const SEARCH_USAGE: &str = "Usage: /websearch <search query>";
pub const SEARCH_FAILED: &str = "Error performing web search.";

pub const REGISTRATION_ERROR: &str = "An error occurred while starting. Please try again later.";
pub const CONTACT_ERROR: &str = "Unable to process contact. Please try again.";
pub const TEXT_ERROR: &str = "An error occurred while processing your message. Please try again.";
pub const FILE_ERROR: &str = "An error occurred while processing the file. Please try again.";
pub const SEARCH_ERROR: &str = "An error occurred. Please try again later.";

pub fn contact_saved(phone: &str, referral_code: &str) -> String {
    format!(
        "Thanks! We have your phone number: {}. Your personal referral code is {}. \
         Share it with friends to earn bonuses!",
        phone, referral_code
    )
}

pub fn file_analysis(local_name: &str, description: &str) -> String {
    format!("File '{}' analysis:\n{}", local_name, description)
}

/// HTML reply with the summary followed by the links numbered from 1.
pub fn search_results(summary: &str, links: &[String]) -> Reply {
    let mut text = format!(
        "<b>Summary</b>:\n{}\n\n<b>Top Links</b>:\n",
        escape_html(summary)
    );
    for (i, link) in links.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, escape_html(link)));
    }
    Reply::html(text)
}
