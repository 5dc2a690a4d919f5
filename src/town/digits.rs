use crate::error::TownError;

pub const KEYCAP_TEN: &str = "\u{1F51F}";
pub const KEYCAP_ASTERISK: &str = "*\u{FE0F}\u{20E3}";

const KEYCAP_DIGITS: [&str; 10] = [
    "0\u{FE0F}\u{20E3}",
    "1\u{FE0F}\u{20E3}",
    "2\u{FE0F}\u{20E3}",
    "3\u{FE0F}\u{20E3}",
    "4\u{FE0F}\u{20E3}",
    "5\u{FE0F}\u{20E3}",
    "6\u{FE0F}\u{20E3}",
    "7\u{FE0F}\u{20E3}",
    "8\u{FE0F}\u{20E3}",
    "9\u{FE0F}\u{20E3}",
];

pub const MAX_VOTES: u8 = 20;

pub fn keycap(digit: u32) -> &'static str {
    KEYCAP_DIGITS[(digit % 10) as usize]
}

/// Renders every decimal digit of a seat number as a keycap emoji.
pub fn seat_digits(seat: usize) -> String {
    seat.to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .map(keycap)
        .collect()
}

/// The reactions used to mark a vote tally on a nomination.
///
/// Reactions have to be unique, so tallies above 9 use 🔟 (or *️⃣ for twenty)
/// for the tens and only add the ones digit when it isn't zero.
pub fn vote_reactions(votes: u8) -> Result<Vec<&'static str>, TownError> {
    if votes > MAX_VOTES {
        return Err(TownError::InvalidVoteCount(votes as i64));
    }
    let tens = votes / 10;
    let ones = votes % 10;
    let mut reactions = Vec::with_capacity(2);
    match tens {
        1 => reactions.push(KEYCAP_TEN),
        2 => reactions.push(KEYCAP_ASTERISK),
        _ => {}
    }
    if !(ones == 0 && tens > 0) {
        reactions.push(keycap(ones as u32));
    }
    Ok(reactions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_numbers_become_keycaps() {
        assert_eq!(seat_digits(7), "7\u{FE0F}\u{20E3}");
        assert_eq!(seat_digits(12), "1\u{FE0F}\u{20E3}2\u{FE0F}\u{20E3}");
    }

    #[test]
    fn single_digit_votes() {
        assert_eq!(vote_reactions(0).unwrap(), vec![keycap(0)]);
        assert_eq!(vote_reactions(6).unwrap(), vec![keycap(6)]);
    }

    #[test]
    fn double_digit_votes() {
        assert_eq!(vote_reactions(10).unwrap(), vec![KEYCAP_TEN]);
        assert_eq!(vote_reactions(13).unwrap(), vec![KEYCAP_TEN, keycap(3)]);
        assert_eq!(vote_reactions(20).unwrap(), vec![KEYCAP_ASTERISK]);
    }

    #[test]
    fn too_many_votes() {
        assert!(matches!(vote_reactions(21), Err(TownError::InvalidVoteCount(21))));
    }
}
