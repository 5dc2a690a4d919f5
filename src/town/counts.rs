use std::fmt;

/// How many of each character type a game with a given number of
/// (non-traveling) players should have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterCount {
    pub townsfolk: u8,
    pub outsiders: u8,
    pub minions: u8,
    pub demons: u8,
}

const fn count(townsfolk: u8, outsiders: u8, minions: u8, demons: u8) -> CharacterCount {
    CharacterCount {
        townsfolk,
        outsiders,
        minions,
        demons,
    }
}

const MIN_PLAYERS: usize = 5;

const COUNTS: [CharacterCount; 11] = [
    count(3, 0, 1, 1),
    count(3, 1, 1, 1),
    count(5, 0, 1, 1),
    count(5, 1, 1, 1),
    count(5, 2, 1, 1),
    count(7, 0, 2, 1),
    count(7, 1, 2, 1),
    count(7, 2, 2, 1),
    count(9, 0, 3, 1),
    count(9, 1, 3, 1),
    count(9, 2, 3, 1),
];

impl CharacterCount {
    pub fn for_players(players: usize) -> Option<Self> {
        players.checked_sub(MIN_PLAYERS).and_then(|i| COUNTS.get(i)).copied()
    }
}

/// The short `town/out/minion/demon` form used in the town square listing.
impl fmt::Display for CharacterCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.townsfolk, self.outsiders, self.minions, self.demons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_or_too_many_players_have_no_count() {
        assert_eq!(CharacterCount::for_players(0), None);
        assert_eq!(CharacterCount::for_players(4), None);
        assert_eq!(CharacterCount::for_players(16), None);
    }

    #[test]
    fn counts_follow_the_table() {
        assert_eq!(CharacterCount::for_players(5), Some(count(3, 0, 1, 1)));
        assert_eq!(CharacterCount::for_players(9), Some(count(5, 2, 1, 1)));
        assert_eq!(CharacterCount::for_players(10), Some(count(7, 0, 2, 1)));
        assert_eq!(CharacterCount::for_players(15), Some(count(9, 2, 3, 1)));
    }

    #[test]
    fn every_game_has_one_demon() {
        for players in 5..=15 {
            let count = CharacterCount::for_players(players).unwrap();
            assert_eq!(count.demons, 1);
            let total = count.townsfolk + count.outsiders + count.minions + count.demons;
            assert_eq!(total as usize, players);
        }
    }

    #[test]
    fn short_form() {
        assert_eq!(CharacterCount::for_players(8).unwrap().to_string(), "5/1/1/1");
    }
}
