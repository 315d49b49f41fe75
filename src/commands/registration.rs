use teloxide::{
    dispatching::dialogue::InMemStorageError,
    prelude::*,
    types::{InputFile, ParseMode, User},
    RequestError,
};
use tera::{Context, Tera};

use crate::{
    keyboards::get_review_keyboard,
    types::{HandlerResult, Portrait, RegistrationDialogue, RegistrationState, Song},
};

/// Where submissions go for moderation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSettings {
    pub review_group_id: Option<ChatId>,
    pub accepted_group_id: Option<ChatId>,
}

const FORM_FIELDS: [&str; 5] = [
    "Name and house:",
    "Race:",
    "Birth date:",
    "Parents:",
    "Subclass:",
];
const MANDATORY_FIELDS: usize = 4;
const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormCard {
    pub name: String,
    pub race: String,
    pub birth: String,
    pub parents: String,
    pub subclass: String,
}

pub fn form_is_complete(text: &str) -> bool {
    FORM_FIELDS[..MANDATORY_FIELDS]
        .iter()
        .all(|label| text.contains(label))
}

/// Reads the form line by line; labels and the quill marker are stripped.
pub fn parse_form(text: &str) -> FormCard {
    let lines: Vec<&str> = text.trim().lines().collect();
    let field = |index: usize| {
        let value = lines
            .get(index)
            .map(|line| {
                line.replace(FORM_FIELDS[index], "")
                    .replace('🪶', "")
                    .trim()
                    .to_string()
            })
            .unwrap_or_default();
        if value.is_empty() {
            UNKNOWN.to_string()
        } else {
            value
        }
    };
    FormCard {
        name: field(0),
        race: field(1),
        birth: field(2),
        parents: field(3),
        subclass: field(4),
    }
}

pub fn render_review_card(tera: &Tera, card: &FormCard, applicant: &User) -> Result<String, tera::Error> {
    let mut context = Context::new();
    context.insert("name", &card.name);
    context.insert("race", &card.race);
    context.insert("birth", &card.birth);
    context.insert("parents", &card.parents);
    context.insert("subclass", &card.subclass);
    context.insert("full_name", &applicant.full_name());
    context.insert("username", &applicant.username);
    context.insert("user_id", &applicant.id.0);
    tera.render("review_card.html", &context)
}

pub async fn clear_session(dialogue: &RegistrationDialogue) -> Result<(), InMemStorageError> {
    if dialogue.get().await?.is_some() {
        dialogue.exit().await?;
    }
    Ok(())
}

pub async fn ask_for_form(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &RegistrationDialogue,
    review: &ReviewSettings,
    tera: &Tera,
) -> HandlerResult {
    if review.review_group_id.is_none() {
        bot.send_message(chat_id, "⚠️ Registration is closed right now, please come back later.")
            .await?;
        return Ok(());
    }

    let answer = tera.render("form.html", &Context::new())?;
    bot.send_message(chat_id, answer)
        .parse_mode(ParseMode::Html)
        .await?;
    dialogue.update(RegistrationState::AwaitingForm).await?;
    Ok(())
}

pub async fn receive_form(bot: Bot, dialogue: RegistrationDialogue, message: Message) -> HandlerResult {
    match message.text() {
        Some(text) if form_is_complete(text) => {
            bot.send_message(
                message.chat.id,
                "I take the sheet from you.\nNow send a sticker of your character, or a clear picture of them.",
            )
            .await?;
            dialogue
                .update(RegistrationState::AwaitingPortrait {
                    form: text.to_string(),
                })
                .await?;
        }
        _ => {
            let labels = FORM_FIELDS[..MANDATORY_FIELDS]
                .iter()
                .map(|label| format!("- {}", label))
                .collect::<Vec<_>>()
                .join("\n");
            bot.send_message(
                message.chat.id,
                format!(
                    "⚠️ Please copy the form exactly as given and fill in every part:\n{}",
                    labels
                ),
            )
            .await?;
        }
    }
    Ok(())
}

pub async fn receive_portrait(
    bot: Bot,
    dialogue: RegistrationDialogue,
    form: String,
    message: Message,
) -> HandlerResult {
    let portrait = if let Some(sticker) = message.sticker() {
        Portrait::Sticker(sticker.file.id.clone())
    } else if let Some(photo) = message.photo().and_then(|sizes| sizes.last()) {
        Portrait::Photo(photo.file.id.clone())
    } else {
        bot.send_message(message.chat.id, "⚠️ Please send a sticker or a photo.")
            .await?;
        return Ok(());
    };

    bot.send_message(message.chat.id, "✅ Got it.\n🎵 Now send the song that describes you.")
        .await?;
    dialogue
        .update(RegistrationState::AwaitingSong { form, portrait })
        .await?;
    Ok(())
}

pub async fn receive_song(
    bot: Bot,
    dialogue: RegistrationDialogue,
    (form, portrait): (String, Portrait),
    message: Message,
) -> HandlerResult {
    let Some(audio) = message.audio() else {
        bot.send_message(message.chat.id, "⚠️ Please send a real audio file.")
            .await?;
        return Ok(());
    };

    let song = Song {
        file_id: audio.file.id.clone(),
        title: audio.title.clone(),
        performer: audio.performer.clone(),
    };
    bot.send_message(message.chat.id, "✅ Song received.\n🎼 Finally, send a cover picture for it.")
        .await?;
    dialogue
        .update(RegistrationState::AwaitingCover {
            form,
            portrait,
            song,
        })
        .await?;
    Ok(())
}

async fn submit(
    bot: &Bot,
    review_group: ChatId,
    card: String,
    applicant: &User,
    portrait: Portrait,
    song: Song,
    cover: String,
) -> Result<(), RequestError> {
    bot.send_message(review_group, "📜 A new profile was submitted:")
        .await?;
    bot.send_message(review_group, card)
        .parse_mode(ParseMode::Html)
        .reply_markup(get_review_keyboard(applicant.id))
        .await?;

    match portrait {
        Portrait::Sticker(file_id) => {
            bot.send_sticker(review_group, InputFile::file_id(file_id))
                .await?;
        }
        Portrait::Photo(file_id) => {
            bot.send_photo(review_group, InputFile::file_id(file_id))
                .caption("🖼 Portrait")
                .await?;
        }
    }

    let mut audio = bot
        .send_audio(review_group, InputFile::file_id(song.file_id))
        .caption("🎵 Song");
    if let Some(title) = song.title {
        audio = audio.title(title);
    }
    if let Some(performer) = song.performer {
        audio = audio.performer(performer);
    }
    audio.await?;

    bot.send_photo(review_group, InputFile::file_id(cover))
        .caption("🎼 Song cover")
        .await?;
    Ok(())
}

pub async fn receive_cover(
    bot: Bot,
    dialogue: RegistrationDialogue,
    (form, portrait, song): (String, Portrait, Song),
    message: Message,
    review: ReviewSettings,
    tera: std::sync::Arc<Tera>,
) -> HandlerResult {
    let Some(cover) = message.photo().and_then(|sizes| sizes.last()) else {
        bot.send_message(message.chat.id, "⚠️ Please send a photo.")
            .await?;
        return Ok(());
    };
    let (Some(applicant), Some(review_group)) = (message.from(), review.review_group_id) else {
        clear_session(&dialogue).await?;
        return Ok(());
    };

    let card = render_review_card(&tera, &parse_form(&form), applicant)?;
    let result = submit(
        &bot,
        review_group,
        card,
        applicant,
        portrait,
        song,
        cover.file.id.clone(),
    )
    .await;
    clear_session(&dialogue).await?;

    match result {
        Ok(()) => {
            log::info!("Registration of user {} sent for review", applicant.id.0);
            bot.send_message(
                message.chat.id,
                "✅ Your details were sent! Wait for the council to approve them. Welcome to Eclis.",
            )
            .await?;
        }
        Err(err) => {
            log::error!(
                "Can't send registration of user {} for review: {}",
                applicant.id.0,
                err
            );
            bot.send_message(
                message.chat.id,
                "❌ Something went wrong while sending your details. Please try again later.",
            )
            .await?;
        }
    }
    Ok(())
}

pub async fn cancel(bot: &Bot, message: &Message, dialogue: &RegistrationDialogue) -> HandlerResult {
    if !message.chat.is_private() {
        return Ok(());
    }
    clear_session(dialogue).await?;
    bot.send_message(message.chat.id, "Registration cancelled. Use /start to begin again.")
        .await?;
    Ok(())
}

pub async fn prompt_start(bot: Bot, message: Message) -> HandlerResult {
    bot.send_message(message.chat.id, "Please use /start to begin.")
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::start::test_tera;
    use teloxide::types::UserId;

    const FILLED: &str = "🪶Name and house: Arwen Undomiel\n🪶Race: Elf\n🪶Birth date: 2001-03-04\n🪶Parents: Elrond / Celebrian\n🪶Subclass:";

    fn applicant() -> User {
        User {
            id: UserId(4242),
            is_bot: false,
            first_name: "Arwen".to_string(),
            last_name: None,
            username: None,
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        }
    }

    #[test]
    fn form_needs_every_mandatory_label() {
        assert!(form_is_complete(FILLED));
        assert!(!form_is_complete("🪶Name and house: Arwen\n🪶Race: Elf"));
    }

    #[test]
    fn missing_values_become_unknown() {
        let card = parse_form(FILLED);
        assert_eq!(
            card,
            FormCard {
                name: "Arwen Undomiel".to_string(),
                race: "Elf".to_string(),
                birth: "2001-03-04".to_string(),
                parents: "Elrond / Celebrian".to_string(),
                subclass: UNKNOWN.to_string(),
            }
        );
        assert_eq!(parse_form("Name and house: Bob").race, UNKNOWN);
    }

    #[test]
    fn review_card_mentions_the_applicant() {
        let card = render_review_card(&test_tera(), &parse_form(FILLED), &applicant()).unwrap();

        assert!(card.contains("Name: Arwen Undomiel"));
        assert!(card.contains("Subclass: Unknown"));
        assert!(card.contains("no username"));
        assert!(card.contains("<code>4242</code>"));
    }
}
