use crate::define_emoji;

define_emoji!(
    Yes => "✅",
    No => "❌",
    Info => "ℹ️",
    Warn => "⚠️",
    Bug => "🐛"
);

#[macro_use]
mod macros {
    #[macro_export]
    macro_rules! define_emoji {
        ($($name: ident => $chat: literal), *) => {
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub enum Emoji {
                $( $name ,)*
            }

            impl std::fmt::Display for Emoji {
                fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                    write!(f, "{}", self.for_chat())
                }
            }

            impl Emoji {
                pub fn for_chat(&self) -> &'static str {
                    match self {
                        $(Emoji::$name => $chat ,)*
                    }
                }
            }
        };
    }
}
