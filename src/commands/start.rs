use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use tera::{Context, Tera};

use super::Command;
use super::registration::clear_session;
use crate::{
    keyboards::get_start_keyboard,
    types::{HandlerResult, RegistrationDialogue},
};

pub fn render_start(tera: &Tera, first_name: &str) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("first_name", first_name);
    tera.render("start.html", &context)
}

pub async fn show_start_info(
    bot: &Bot,
    message: &Message,
    dialogue: &RegistrationDialogue,
    tera: &Tera,
) -> HandlerResult {
    if !message.chat.is_private() {
        bot.send_message(message.chat.id, "✅ The Druid is watching over this group.")
            .await?;
        return Ok(());
    }

    clear_session(dialogue).await?;
    let first_name = message
        .from()
        .map(|user| user.first_name.clone())
        .unwrap_or_else(|| "traveller".to_string());
    let answer = render_start(tera, &first_name)?;
    bot.send_message(message.chat.id, answer)
        .parse_mode(ParseMode::Html)
        .reply_markup(get_start_keyboard())
        .await?;

    Ok(())
}

pub async fn show_help(bot: &Bot, message: &Message) -> HandlerResult {
    bot.send_message(message.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_tera() -> Tera {
    Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*")).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_text_escapes_the_name() {
        let text = render_start(&test_tera(), "<Arwen>").unwrap();
        assert!(text.contains("Welcome, &lt;Arwen&gt;!"));
    }
}
