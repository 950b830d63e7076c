//! Owned view of slash-command options.

use std::collections::HashMap;

use serenity::all::{ResolvedOption, ResolvedValue};

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Boolean(bool),
    Integer(i64),
    String(String),
    User(u64),
    Role(u64),
    Channel(u64),
}

/// Options of one invocation, with subcommands flattened.
///
/// The innermost subcommand name is kept in `subcommand`; its options are merged
/// with the top-level ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandArgs {
    pub subcommand: Option<String>,
    values: HashMap<String, OptionValue>,
}

impl CommandArgs {
    pub fn from_resolved(options: &[ResolvedOption<'_>]) -> Self {
        let mut args = Self::default();
        args.collect(options);
        args
    }

    fn collect(&mut self, options: &[ResolvedOption<'_>]) {
        for option in options {
            let value = match &option.value {
                ResolvedValue::SubCommand(nested) | ResolvedValue::SubCommandGroup(nested) => {
                    self.subcommand = Some(option.name.to_string());
                    self.collect(nested);
                    continue;
                }
                ResolvedValue::Boolean(value) => OptionValue::Boolean(*value),
                ResolvedValue::Integer(value) => OptionValue::Integer(*value),
                ResolvedValue::String(value) => OptionValue::String(value.to_string()),
                ResolvedValue::User(user, _) => OptionValue::User(user.id.get()),
                ResolvedValue::Role(role) => OptionValue::Role(role.id.get()),
                ResolvedValue::Channel(channel) => OptionValue::Channel(channel.id.get()),
                _ => continue,
            };
            self.values.insert(option.name.to_string(), value);
        }
    }

    /// Sets an option, replacing any previous value.
    #[cfg(test)]
    pub fn with(mut self, name: &str, value: OptionValue) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    #[cfg(test)]
    pub fn with_subcommand(mut self, name: &str) -> Self {
        self.subcommand = Some(name.to_string());
        self
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(OptionValue::Boolean(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(OptionValue::Integer(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        match self.values.get(name) {
            Some(OptionValue::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn user(&self, name: &str) -> Option<u64> {
        match self.values.get(name) {
            Some(OptionValue::User(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn role(&self, name: &str) -> Option<u64> {
        match self.values.get(name) {
            Some(OptionValue::Role(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn channel(&self, name: &str) -> Option<u64> {
        match self.values.get(name) {
            Some(OptionValue::Channel(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn required_string(&self, name: &str) -> Result<&str, AppError> {
        self.string(name).ok_or_else(|| missing(name))
    }

    pub fn required_role(&self, name: &str) -> Result<u64, AppError> {
        self.role(name).ok_or_else(|| missing(name))
    }

    pub fn required_integer(&self, name: &str) -> Result<i64, AppError> {
        self.integer(name).ok_or_else(|| missing(name))
    }
}

fn missing(name: &str) -> AppError {
    AppError::BadRequest(format!("Missing option `{}`", name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getters_check_the_option_type() {
        let args = CommandArgs::default()
            .with("role", OptionValue::Role(10))
            .with("winners", OptionValue::Integer(3));

        assert_eq!(args.role("role"), Some(10));
        assert_eq!(args.user("role"), None);
        assert_eq!(args.integer("winners"), Some(3));
        assert!(matches!(
            args.required_string("name"),
            Err(AppError::BadRequest(msg)) if msg == "Missing option `name`"
        ));
    }
}
