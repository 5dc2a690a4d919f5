use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use twilight_model::id::marker::{ChannelMarker, MessageMarker, RoleMarker, UserMarker};
use twilight_model::id::Id;

use crate::error::TownError;
use crate::town::counts::CharacterCount;
use crate::town::names::{NameFormat, PlayerInfo};
use crate::town::settings::{RoleKind, TownSettings};

type UserId = Id<UserMarker>;

/// The message a nomination was announced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nomination {
    pub channel_id: Id<ChannelMarker>,
    pub message_id: Id<MessageMarker>,
}

/// Who a command argument points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberArg {
    Author,
    Seat(i64),
    User(UserId),
}

/// One game, living inside a town category.
///
/// Roles and emojis are a snapshot of the category settings at the time the
/// town was created, they only change when the town is cleared.
#[derive(Debug)]
pub struct Town {
    order: Vec<UserId>,
    info: HashMap<UserId, PlayerInfo>,
    travelers: HashSet<UserId>,
    storytellers: Vec<UserId>,
    locked: bool,
    nomination: Option<Nomination>,
    prev_nomination: Option<Nomination>,
    settings: TownSettings,
    format: NameFormat,
}

impl Town {
    pub fn new(settings: TownSettings) -> Self {
        let format = NameFormat::new(&settings);
        Town {
            order: vec![],
            info: HashMap::new(),
            travelers: HashSet::new(),
            storytellers: vec![],
            locked: false,
            nomination: None,
            prev_nomination: None,
            settings,
            format,
        }
    }

    pub fn format(&self) -> &NameFormat {
        &self.format
    }

    pub fn role(&self, kind: RoleKind) -> Option<Id<RoleMarker>> {
        self.settings.role(kind)
    }

    pub fn players(&self) -> &[UserId] {
        &self.order
    }

    pub fn storytellers(&self) -> &[UserId] {
        &self.storytellers
    }

    pub fn is_player(&self, user: UserId) -> bool {
        self.info.contains_key(&user)
    }

    pub fn is_traveler(&self, user: UserId) -> bool {
        self.travelers.contains(&user)
    }

    pub fn is_storyteller(&self, user: UserId) -> bool {
        self.storytellers.contains(&user)
    }

    pub fn info(&self, user: UserId) -> PlayerInfo {
        self.info.get(&user).cloned().unwrap_or_default()
    }

    /// The nickname a member should have, given the name they show right now.
    pub fn nickname_for(&self, user: UserId, display_name: &str) -> String {
        if self.is_player(user) {
            self.format.player_nickname(&self.info(user), display_name)
        } else if self.is_storyteller(user) {
            self.format.storyteller_nickname(display_name)
        } else {
            self.format.restored_nickname(display_name)
        }
    }

    /// Everybody the town ever touched, for cleaning up after the game.
    pub fn everyone(&self) -> Vec<UserId> {
        let mut everyone = self.order.clone();
        everyone.extend(self.storytellers.iter().filter(|st| !self.is_player(**st)));
        everyone
    }

    /// Seats a new player at the end of the table, `None` if they already play.
    pub fn add_player(&mut self, user: UserId) -> Option<usize> {
        if self.is_player(user) {
            return None;
        }
        self.order.push(user);
        let seat = self.order.len();
        self.info.insert(
            user,
            PlayerInfo {
                seat: Some(seat),
                ..PlayerInfo::default()
            },
        );
        Some(seat)
    }

    /// Removes a player and returns everyone who moved up a seat.
    pub fn remove_player(&mut self, user: UserId) -> Vec<UserId> {
        if self.info.remove(&user).is_none() {
            return vec![];
        }
        self.order.retain(|player| *player != user);
        self.travelers.remove(&user);
        self.renumber()
    }

    /// Returns whether anything changed.
    pub fn set_traveling(&mut self, user: UserId, traveling: bool) -> bool {
        let changed = if traveling {
            self.travelers.insert(user)
        } else {
            self.travelers.remove(&user)
        };
        if let Some(info) = self.info.get_mut(&user) {
            info.traveling = traveling;
        }
        changed
    }

    pub fn add_storyteller(&mut self, user: UserId) -> bool {
        if self.is_storyteller(user) {
            return false;
        }
        self.storytellers.push(user);
        true
    }

    pub fn remove_storyteller(&mut self, user: UserId) -> bool {
        let before = self.storytellers.len();
        self.storytellers.retain(|st| *st != user);
        before != self.storytellers.len()
    }

    pub fn take_storytellers(&mut self) -> Vec<UserId> {
        std::mem::take(&mut self.storytellers)
    }

    /// Moves a player to another seat, everyone in between shifts over.
    pub fn sit(&mut self, user: UserId, seat: i64) -> Result<Vec<UserId>, TownError> {
        let current = self
            .order
            .iter()
            .position(|player| *player == user)
            .ok_or(TownError::BadPlayer(user))?;
        if seat < 1 || seat as usize > self.order.len() {
            return Err(TownError::BadSeat);
        }
        let player = self.order.remove(current);
        self.order.insert(seat as usize - 1, player);
        Ok(self.renumber())
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<UserId> {
        self.order.shuffle(rng);
        self.renumber()
    }

    fn renumber(&mut self) -> Vec<UserId> {
        let mut moved = vec![];
        for (index, player) in self.order.iter().enumerate() {
            if let Some(info) = self.info.get_mut(player) {
                if info.seat != Some(index + 1) {
                    info.seat = Some(index + 1);
                    moved.push(*player);
                }
            }
        }
        moved
    }

    pub fn resolve_member(&self, arg: MemberArg, author: UserId) -> Result<UserId, TownError> {
        match arg {
            MemberArg::Author => Ok(author),
            MemberArg::User(user) => Ok(user),
            MemberArg::Seat(0) if self.storytellers.len() == 1 => Ok(self.storytellers[0]),
            MemberArg::Seat(seat) if seat >= 1 && seat as usize <= self.order.len() => {
                Ok(self.order[seat as usize - 1])
            }
            MemberArg::Seat(_) => Err(TownError::BadSeat),
        }
    }

    pub fn resolve_player(&self, arg: MemberArg, author: UserId) -> Result<UserId, TownError> {
        let user = self.resolve_member(arg, author)?;
        if self.is_player(user) {
            Ok(user)
        } else {
            Err(TownError::BadPlayer(user))
        }
    }

    fn player_info_mut(&mut self, user: UserId) -> Result<&mut PlayerInfo, TownError> {
        self.info.get_mut(&user).ok_or(TownError::BadPlayer(user))
    }

    /// Dead players get their one ghost vote.
    pub fn set_dead(&mut self, user: UserId) -> Result<(), TownError> {
        let info = self.player_info_mut(user)?;
        info.dead = true;
        info.num_votes = Some(1);
        Ok(())
    }

    pub fn set_voted(&mut self, user: UserId) -> Result<(), TownError> {
        let info = self.player_info_mut(user)?;
        info.dead = true;
        info.num_votes = Some(0);
        Ok(())
    }

    pub fn set_alive(&mut self, user: UserId) -> Result<(), TownError> {
        let info = self.player_info_mut(user)?;
        info.dead = false;
        info.num_votes = None;
        Ok(())
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn alive_count(&self) -> usize {
        self.order.iter().filter(|player| !self.info(**player).dead).count()
    }

    pub fn votes_to_execute(&self) -> usize {
        (self.alive_count() + 1) / 2
    }

    pub fn character_count(&self) -> Option<CharacterCount> {
        let residents = self.order.iter().filter(|player| !self.is_traveler(**player)).count();
        CharacterCount::for_players(residents)
    }

    pub fn ensure_no_nomination(&self) -> Result<(), TownError> {
        match self.nomination {
            Some(_) => Err(TownError::NominationInProgress),
            None => Ok(()),
        }
    }

    pub fn start_nomination(&mut self, nomination: Nomination) -> Result<(), TownError> {
        self.ensure_no_nomination()?;
        self.nomination = Some(nomination);
        Ok(())
    }

    /// The nomination votes get recorded on, falling back to the last one.
    pub fn vote_target(&self) -> Result<Nomination, TownError> {
        self.nomination.or(self.prev_nomination).ok_or(TownError::NoNomination)
    }

    pub fn record_votes(&mut self, nomination: Nomination) {
        if self.nomination == Some(nomination) {
            self.nomination = None;
        }
        self.prev_nomination = Some(nomination);
    }

    pub fn cancel_nomination(&mut self) -> Result<Nomination, TownError> {
        self.nomination
            .take()
            .or_else(|| self.prev_nomination.take())
            .ok_or(TownError::NoNominationToCancel)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn user(id: u64) -> UserId {
        Id::new(id)
    }

    fn town_of(players: u64) -> Town {
        let mut town = Town::new(TownSettings::default());
        for id in 1..=players {
            town.add_player(user(id));
        }
        town
    }

    fn seats(town: &Town) -> Vec<u64> {
        town.players().iter().map(|player| player.get()).collect()
    }

    fn nomination(id: u64) -> Nomination {
        Nomination {
            channel_id: Id::new(1),
            message_id: Id::new(id),
        }
    }

    #[test]
    fn players_are_seated_in_join_order() {
        let mut town = Town::new(TownSettings::default());
        assert_eq!(town.add_player(user(10)), Some(1));
        assert_eq!(town.add_player(user(20)), Some(2));
        assert_eq!(town.add_player(user(10)), None);
        assert_eq!(town.info(user(20)).seat, Some(2));
    }

    #[test]
    fn leaving_moves_everyone_after_up() {
        let mut town = town_of(4);
        town.set_traveling(user(2), true);
        assert_eq!(town.remove_player(user(2)), vec![user(3), user(4)]);
        assert_eq!(seats(&town), vec![1, 3, 4]);
        assert_eq!(town.info(user(4)).seat, Some(3));
        assert!(!town.is_traveler(user(2)));
        assert!(town.remove_player(user(2)).is_empty());
    }

    #[test]
    fn sitting_shifts_the_players_in_between() {
        let mut town = town_of(5);
        let moved = town.sit(user(5), 2).unwrap();
        assert_eq!(seats(&town), vec![1, 5, 2, 3, 4]);
        assert_eq!(moved, vec![user(5), user(2), user(3), user(4)]);

        town.sit(user(1), 5).unwrap();
        assert_eq!(seats(&town), vec![5, 2, 3, 4, 1]);

        assert!(matches!(town.sit(user(1), 0), Err(TownError::BadSeat)));
        assert!(matches!(town.sit(user(1), 6), Err(TownError::BadSeat)));
        assert!(matches!(town.sit(user(9), 1), Err(TownError::BadPlayer(_))));
    }

    #[test]
    fn shuffling_keeps_everyone_seated() {
        let mut town = town_of(8);
        town.shuffle(&mut StdRng::seed_from_u64(7));
        let mut sorted = seats(&town);
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=8).collect::<Vec<_>>());
        for (index, player) in town.players().iter().enumerate() {
            assert_eq!(town.info(*player).seat, Some(index + 1));
        }
    }

    #[test]
    fn members_resolve_by_seat() {
        let mut town = town_of(3);
        let author = user(99);
        assert_eq!(town.resolve_member(MemberArg::Author, author).unwrap(), author);
        assert_eq!(town.resolve_member(MemberArg::Seat(2), author).unwrap(), user(2));
        assert!(matches!(town.resolve_member(MemberArg::Seat(0), author), Err(TownError::BadSeat)));
        assert!(matches!(town.resolve_member(MemberArg::Seat(4), author), Err(TownError::BadSeat)));

        town.add_storyteller(user(50));
        assert_eq!(town.resolve_member(MemberArg::Seat(0), author).unwrap(), user(50));
        town.add_storyteller(user(51));
        assert!(matches!(town.resolve_member(MemberArg::Seat(0), author), Err(TownError::BadSeat)));

        assert!(matches!(
            town.resolve_player(MemberArg::User(user(50)), author),
            Err(TownError::BadPlayer(_))
        ));
        assert_eq!(town.resolve_player(MemberArg::Seat(3), author).unwrap(), user(3));
    }

    #[test]
    fn storytellers_are_tracked_in_order() {
        let mut town = town_of(0);
        assert!(town.add_storyteller(user(2)));
        assert!(town.add_storyteller(user(1)));
        assert!(!town.add_storyteller(user(2)));
        assert_eq!(town.storytellers(), &[user(2), user(1)]);
        assert!(town.remove_storyteller(user(2)));
        assert!(!town.remove_storyteller(user(2)));
        assert_eq!(town.take_storytellers(), vec![user(1)]);
        assert!(town.storytellers().is_empty());
    }

    #[test]
    fn death_and_votes() {
        let mut town = town_of(7);
        assert_eq!(town.alive_count(), 7);
        assert_eq!(town.votes_to_execute(), 4);

        town.set_dead(user(1)).unwrap();
        assert_eq!(town.info(user(1)).num_votes, Some(1));
        town.set_voted(user(2)).unwrap();
        assert_eq!(town.info(user(2)).num_votes, Some(0));
        assert!(town.info(user(2)).dead);
        assert_eq!(town.alive_count(), 5);
        assert_eq!(town.votes_to_execute(), 3);

        town.set_alive(user(1)).unwrap();
        assert_eq!(town.info(user(1)), PlayerInfo {
            seat: Some(1),
            ..PlayerInfo::default()
        });
        assert!(town.set_dead(user(42)).is_err());
    }

    #[test]
    fn travelers_do_not_count_towards_characters() {
        let mut town = town_of(8);
        assert_eq!(town.character_count().unwrap().to_string(), "5/1/1/1");
        town.set_traveling(user(8), true);
        assert!(town.info(user(8)).traveling);
        assert_eq!(town.character_count().unwrap().to_string(), "5/0/1/1");

        let small = town_of(4);
        assert!(small.character_count().is_none());
    }

    #[test]
    fn nominations_flow() {
        let mut town = town_of(5);
        assert!(matches!(town.vote_target(), Err(TownError::NoNomination)));
        assert!(matches!(town.cancel_nomination(), Err(TownError::NoNominationToCancel)));

        town.start_nomination(nomination(1)).unwrap();
        assert!(matches!(town.start_nomination(nomination(2)), Err(TownError::NominationInProgress)));
        assert_eq!(town.vote_target().unwrap(), nomination(1));

        town.record_votes(nomination(1));
        assert!(town.ensure_no_nomination().is_ok());
        assert_eq!(town.vote_target().unwrap(), nomination(1));

        town.start_nomination(nomination(2)).unwrap();
        assert_eq!(town.cancel_nomination().unwrap(), nomination(2));
        assert_eq!(town.cancel_nomination().unwrap(), nomination(1));
        assert!(town.cancel_nomination().is_err());
    }

    #[test]
    fn nicknames_follow_the_town() {
        let mut town = town_of(3);
        town.add_storyteller(user(7));
        town.set_dead(user(2)).unwrap();
        assert_eq!(town.nickname_for(user(1), "Ferris"), "_01 Ferris");
        assert_eq!(town.nickname_for(user(2), "_02 Crab"), "_02💀👻 Crab");
        assert_eq!(town.nickname_for(user(7), "Sage"), "!ST Sage");
        assert_eq!(town.nickname_for(user(9), "_04💀 Gone"), "Gone");
    }

    #[test]
    fn everyone_includes_storytellers_once() {
        let mut town = town_of(2);
        town.add_storyteller(user(3));
        town.add_storyteller(user(1));
        assert_eq!(town.everyone(), vec![user(1), user(2), user(3)]);
    }
}
