use teloxide::{
    prelude::*,
    types::{CallbackQuery, ParseMode, User, UserId},
};

use super::registration::ReviewSettings;
use crate::types::HandlerResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
}

/// Parses `accept:<user id>` / `reject:<user id>` callback data.
pub fn parse_review_action(data: &str) -> Option<(Verdict, UserId)> {
    let (action, user_id) = data.split_once(':')?;
    let verdict = match action {
        "accept" => Verdict::Accept,
        "reject" => Verdict::Reject,
        _ => return None,
    };
    let user_id = user_id.parse().ok()?;
    Some((verdict, UserId(user_id)))
}

fn reviewer_name(reviewer: &User) -> String {
    match &reviewer.username {
        Some(username) => format!("@{}", username),
        None => reviewer.full_name(),
    }
}

fn verdict_line(verdict: Verdict, reviewer: &User) -> String {
    match verdict {
        Verdict::Accept => format!("--- ✅ Approved by {} ---", reviewer_name(reviewer)),
        Verdict::Reject => format!("--- ❌ Rejected by {} ---", reviewer_name(reviewer)),
    }
}

async fn apply_verdict(
    bot: &Bot,
    query: &CallbackQuery,
    message: &Message,
    verdict: Verdict,
    applicant: UserId,
    review: &ReviewSettings,
) -> Result<(), teloxide::RequestError> {
    let original = message.text().unwrap_or_default();
    bot.edit_message_text(
        message.chat.id,
        message.id,
        format!("{}\n\n{}", original, verdict_line(verdict, &query.from)),
    )
    .await?;

    match verdict {
        Verdict::Accept => {
            bot.send_message(
                applicant,
                "🎉 Your profile was approved!\n\nWelcome to the family of Eclis.",
            )
            .await?;
            if let Some(accepted_group) = review.accepted_group_id {
                bot.send_message(
                    accepted_group,
                    format!(
                        "🎊 <a href=\"tg://user?id={}\">A new member</a> was accepted into Eclis.",
                        applicant.0
                    ),
                )
                .parse_mode(ParseMode::Html)
                .await?;
            }
        }
        Verdict::Reject => {
            bot.send_message(
                applicant,
                "❌ Unfortunately your profile was rejected.\n\nContact the support if you want to know why.",
            )
            .await?;
        }
    }
    Ok(())
}

pub async fn handle_review(
    bot: Bot,
    query: CallbackQuery,
    (verdict, applicant): (Verdict, UserId),
    review: ReviewSettings,
) -> HandlerResult {
    let Some(message) = query.message.as_ref() else {
        bot.answer_callback_query(query.id).await?;
        return Ok(());
    };
    if review.review_group_id != Some(message.chat.id) {
        log::warn!(
            "Review callback from chat {} outside of the review group",
            message.chat.id.0
        );
        bot.answer_callback_query(query.id).await?;
        return Ok(());
    }

    let answer = match apply_verdict(&bot, &query, message, verdict, applicant, &review).await {
        Ok(()) => {
            log::info!(
                "Registration of user {} reviewed: {:?}",
                applicant.0,
                verdict
            );
            match verdict {
                Verdict::Accept => "The applicant was accepted and notified.",
                Verdict::Reject => "The applicant was rejected and notified.",
            }
        }
        Err(err) => {
            log::error!("Can't apply review verdict for user {}: {}", applicant.0, err);
            "Couldn't process the request."
        }
    };
    bot.answer_callback_query(query.id).text(answer).await?;
    Ok(())
}
