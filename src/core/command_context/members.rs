use twilight_model::id::marker::UserMarker;
use twilight_model::id::Id;

use super::CommandContext;
use crate::error::{CommandError, ParseError};
use crate::parser::MemberToken;
use crate::town::MemberArg;

impl CommandContext {
    pub fn display_name(&self, user_id: Id<UserMarker>) -> String {
        self.bot_context.display_name(self.message.guild_id, user_id)
    }

    pub fn avatar_url(&self, user_id: Id<UserMarker>) -> String {
        self.bot_context.avatar_url(user_id)
    }

    /// Resolves a typed member reference as far as possible without the town, seats stay seats.
    pub async fn member_arg(&self, token: Option<MemberToken>) -> Result<MemberArg, CommandError> {
        match token {
            None => Ok(MemberArg::Author),
            Some(MemberToken::Seat(seat)) => Ok(MemberArg::Seat(seat)),
            Some(MemberToken::Id(id)) => self.member_by_id(id).map(MemberArg::User),
            Some(MemberToken::Name(name)) => self.member_by_name(&name).await.map(MemberArg::User),
        }
    }

    /// The rest of the message as a member reference, the author when nothing is left.
    pub async fn remaining_member_arg(&mut self) -> Result<MemberArg, CommandError> {
        let token = self.parser.get_member_token();
        self.member_arg(token).await
    }

    /// The rest of the message as a member, numbers are ids here and never seats.
    pub async fn remaining_named_member(&mut self) -> Result<Option<Id<UserMarker>>, CommandError> {
        if !self.parser.has_next() {
            return Ok(None);
        }
        let input = self.parser.get_remaining();
        let user_id = match MemberToken::classify_name(&input) {
            MemberToken::Id(id) => self.member_by_id(id)?,
            MemberToken::Name(name) => self.member_by_name(&name).await?,
            MemberToken::Seat(_) => return Err(ParseError::WrongArgumentType(String::from("member")).into()),
        };
        Ok(Some(user_id))
    }

    fn member_by_id(&self, id: u64) -> Result<Id<UserMarker>, CommandError> {
        let guild_id = self.get_guild_id()?;
        match Id::new_checked(id) {
            Some(user_id) if self.bot_context.is_guild_member(guild_id, user_id) => Ok(user_id),
            _ => Err(ParseError::MemberNotFoundById(id).into()),
        }
    }

    async fn member_by_name(&self, name: &str) -> Result<Id<UserMarker>, CommandError> {
        let guild_id = self.get_guild_id()?;
        let format = self.with_town(|town| town.format().clone()).await?;
        Ok(self.bot_context.find_member_by_name(guild_id, name, &format)?)
    }
}
