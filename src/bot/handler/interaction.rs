//! Interaction handler: slash commands and autocomplete.

use serenity::all::{
    CommandInteraction, Context, CreateAutocompleteResponse, CreateInteractionResponse,
    Interaction,
};

use crate::{
    bot::command::{self, macros},
    state::BotState,
};

pub async fn handle_interaction(state: &BotState, ctx: Context, interaction: Interaction) {
    match interaction {
        Interaction::Command(command) => command::handle_command(state, &ctx, &command).await,
        Interaction::Autocomplete(autocomplete) => {
            handle_autocomplete(state, &ctx, &autocomplete).await
        }
        _ => {}
    }
}

/// Answers macro name completions. Other options have no completions.
async fn handle_autocomplete(state: &BotState, ctx: &Context, interaction: &CommandInteraction) {
    let Some(focused) = interaction.data.autocomplete() else {
        return;
    };
    if focused.name != "name" {
        return;
    }

    let response = macros::autocomplete_choices(&state.macro_names, focused.value)
        .into_iter()
        .fold(CreateAutocompleteResponse::new(), |response, name| {
            response.add_string_choice(name.clone(), name)
        });

    if let Err(e) = interaction
        .create_response(&ctx.http, CreateInteractionResponse::Autocomplete(response))
        .await
    {
        tracing::warn!("Failed to answer autocomplete: {:?}", e);
    }
}
