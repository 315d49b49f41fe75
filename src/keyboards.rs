use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, UserId};

pub const CREATE_PROFILE: &str = "create_profile";

pub fn get_start_keyboard() -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = vec![];

    keyboard.push(vec![InlineKeyboardButton::callback(
        "📄 Create a profile",
        CREATE_PROFILE,
    )]);

    InlineKeyboardMarkup::new(keyboard)
}

pub fn get_review_keyboard(applicant: UserId) -> InlineKeyboardMarkup {
    let mut keyboard: Vec<Vec<InlineKeyboardButton>> = vec![];

    keyboard.push(vec![
        InlineKeyboardButton::callback("✅ Accept", format!("accept:{}", applicant.0)),
        InlineKeyboardButton::callback("❌ Reject", format!("reject:{}", applicant.0)),
    ]);

    InlineKeyboardMarkup::new(keyboard)
}
