//! `/macro` and `/macros`: stored support replies.

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, CreateEmbed, Permissions};

use crate::{
    bot::command::{options::CommandArgs, Invocation, Reply},
    error::AppError,
    model::macro_entry::{Macro, MacroParam},
    service::macros::{format_macro_list, MacroNameCache, MacroService},
};

pub const MACRO: &str = "macro";
pub const MACROS: &str = "macros";

/// Discord accepts at most 25 autocomplete choices.
const MAX_CHOICES: usize = 25;

fn name_option(description: &str) -> CreateCommandOption {
    CreateCommandOption::new(CommandOptionType::String, "name", description)
        .required(true)
        .set_autocomplete(true)
}

fn content_options(option: CreateCommandOption, required: bool) -> CreateCommandOption {
    option
        .add_sub_option(
            CreateCommandOption::new(CommandOptionType::String, "title", "Embed title")
                .required(required),
        )
        .add_sub_option(
            CreateCommandOption::new(CommandOptionType::String, "description", "Embed text")
                .required(required),
        )
        .add_sub_option(CreateCommandOption::new(
            CommandOptionType::String,
            "image_url",
            "Image shown in the embed",
        ))
        .add_sub_option(CreateCommandOption::new(
            CommandOptionType::String,
            "color",
            "Embed colour as #RRGGBB",
        ))
}

pub fn register() -> Vec<CreateCommand> {
    let create = CreateCommandOption::new(CommandOptionType::SubCommand, "create", "Create a macro")
        .add_sub_option(
            CreateCommandOption::new(CommandOptionType::String, "name", "Name of the new macro")
                .required(true),
        );
    let edit = CreateCommandOption::new(CommandOptionType::SubCommand, "edit", "Edit a macro")
        .add_sub_option(name_option("Macro to edit"));

    vec![
        CreateCommand::new(MACRO)
            .description("Show a macro")
            .add_option(name_option("Macro to show"))
            .add_option(CreateCommandOption::new(
                CommandOptionType::String,
                "message",
                "Text to send along with the macro",
            )),
        CreateCommand::new(MACROS)
            .description("Manage macros")
            .default_member_permissions(Permissions::MANAGE_MESSAGES)
            .add_option(content_options(create, true))
            .add_option(content_options(edit, false))
            .add_option(
                CreateCommandOption::new(CommandOptionType::SubCommand, "delete", "Delete a macro")
                    .add_sub_option(name_option("Macro to delete")),
            )
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "list",
                "List all macros",
            )),
    ]
}

pub fn macro_embed(entry: &Macro) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(&entry.title)
        .description(&entry.description)
        .colour(entry.color_value());
    if let Some(image_url) = &entry.image_url {
        embed = embed.image(image_url);
    }
    embed
}

/// Macro names matching what the user typed so far.
pub fn autocomplete_choices(cache: &MacroNameCache, input: &str) -> Vec<String> {
    let mut names = cache.search(input);
    names.truncate(MAX_CHOICES);
    names
}

/// Builds the parameters of an edit, keeping fields the user left out.
pub fn merge_edit(current: Macro, args: &CommandArgs) -> MacroParam {
    MacroParam {
        name: current.name,
        title: args.string("title").map(str::to_string).unwrap_or(current.title),
        description: args
            .string("description")
            .map(str::to_string)
            .unwrap_or(current.description),
        image_url: args.string("image_url").map(str::to_string).or(current.image_url),
        embed_color: args.string("color").map(str::to_string).or(current.embed_color),
    }
}

pub async fn run_macro(invocation: &Invocation<'_>, args: &CommandArgs) -> Result<Reply, AppError> {
    let state = invocation.state;
    let entry = MacroService::new(&state.db, &state.macro_names)
        .get(args.required_string("name")?)
        .await?;

    Ok(Reply {
        content: args.string("message").map(str::to_string),
        ..Reply::embed(macro_embed(&entry))
    })
}

pub async fn run_macros(invocation: &Invocation<'_>, args: &CommandArgs) -> Result<Reply, AppError> {
    let state = invocation.state;
    let service = MacroService::new(&state.db, &state.macro_names);

    match args.subcommand.as_deref() {
        Some("create") => {
            let param = MacroParam {
                name: args.required_string("name")?.trim().to_string(),
                title: args.required_string("title")?.to_string(),
                description: args.required_string("description")?.to_string(),
                image_url: args.string("image_url").map(str::to_string),
                embed_color: args.string("color").map(str::to_string),
            };
            let created = service.create(param, invocation.user_id).await?;

            Ok(Reply {
                content: Some(format!("Created the macro `{}`", created.name)),
                ..Reply::embed(macro_embed(&created))
            })
        }
        Some("edit") => {
            let current = service.get(args.required_string("name")?).await?;
            let updated = service.edit(merge_edit(current, args)).await?;

            Ok(Reply {
                content: Some(format!("Updated the macro `{}`", updated.name)),
                ..Reply::embed(macro_embed(&updated))
            })
        }
        Some("delete") => {
            let name = args.required_string("name")?;
            service.delete(name).await?;

            Ok(Reply::text(format!("Deleted the macro `{}`", name)))
        }
        Some("list") => Ok(Reply::text(format_macro_list(&service.list().await?))),
        _ => Err(AppError::BadRequest("Unknown subcommand".to_string())),
    }
}
