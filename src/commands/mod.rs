use teloxide::utils::command::BotCommands;

pub mod registration;
pub mod review;
pub mod start;
pub mod triggers;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "start the bot.")]
    Start,
    #[command(description = "display this text.")]
    Help,
    #[command(description = "add a trigger: /set <keyword> <delaySeconds> <message>")]
    Set(String),
    #[command(description = "list the triggers of this group.")]
    List,
    #[command(description = "remove every trigger of this group.")]
    Clear,
    #[command(description = "abandon the registration form.")]
    Cancel,
}
