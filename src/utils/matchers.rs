use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ID_MATCHER: Regex = Regex::new(r"^<@!?([0-9]+)>$").unwrap();
    static ref ROLE_ID_MATCHER: Regex = Regex::new(r"^<@&([0-9]+)>$").unwrap();
    static ref CHANNEL_ID_MATCHER: Regex = Regex::new(r"^<#([0-9]+)>$").unwrap();
    static ref EMOJI_MATCHER: Regex = Regex::new(r"<(a?):([^:\n]+):([0-9]+)>").unwrap();
    static ref NAME_WITH_DISCRIMINATOR: Regex = Regex::new(r"^(.+)#([0-9]{4})$").unwrap();
}

fn capture_id(matcher: &Regex, msg: &str) -> Option<u64> {
    matcher
        .captures(msg.trim())
        .and_then(|c| c.get(1))
        .and_then(|id| id.as_str().parse().ok())
}

/// The user id of a `<@id>` or `<@!id>` mention.
pub fn get_mention(msg: &str) -> Option<u64> {
    capture_id(&ID_MATCHER, msg)
}

/// The role id of a `<@&id>` mention.
pub fn get_role_id(msg: &str) -> Option<u64> {
    capture_id(&ROLE_ID_MATCHER, msg)
}

/// The channel id of a `<#id>` mention.
pub fn get_channel_id(msg: &str) -> Option<u64> {
    capture_id(&CHANNEL_ID_MATCHER, msg)
}

pub fn contains_emote(msg: &str) -> bool {
    EMOJI_MATCHER.is_match(msg)
}

/// Splits `name#1234` into the name and discriminator.
pub fn split_name(msg: &str) -> Option<(&str, &str)> {
    let captures = NAME_WITH_DISCRIMINATOR.captures(msg)?;
    Some((captures.get(1)?.as_str(), captures.get(2)?.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentions_work() {
        assert_eq!(get_mention("<@282830930237292>"), Some(282830930237292));
        assert_eq!(get_mention("<@!383738338398392>"), Some(383738338398392));
        assert_eq!(get_mention("Hello there"), None);
        assert_eq!(get_mention("<@&3892320392392>"), None);
    }

    #[test]
    fn role_id_works() {
        assert_eq!(get_role_id("<@&3892320392392>"), Some(3892320392392));
        assert_eq!(get_role_id("<@#439332392320>"), None);
    }

    #[test]
    fn channel_id_works() {
        assert_eq!(get_channel_id("<#7012116760323232>"), Some(7012116760323232));
        assert_eq!(get_channel_id("<@!39238293809232>"), None);
    }

    #[test]
    fn emote_matcher_works() {
        assert!(contains_emote("<:someCustomEmote:3747384343434>"));
        assert!(contains_emote("<a:spinning:3747384343434>"));
        assert!(!contains_emote("💀"));
        assert!(!contains_emote("Hello there"));
    }

    #[test]
    fn names_split_on_discriminator() {
        assert_eq!(split_name("Ferris#0001"), Some(("Ferris", "0001")));
        assert_eq!(split_name("Ferris"), None);
        assert_eq!(split_name("Ferris#12"), None);
    }
}
