pub mod nodes;

#[macro_use]
pub mod macros {
    /// Builds a [`CommandNode`](crate::commands::meta::nodes::CommandNode), sub-commands are optional.
    #[macro_export]
    macro_rules! command {
        (
            name: $name: literal,
            aliases: [$($alias: literal),* $(,)?],
            handler: $handler: expr,
            group: $group: expr,
            flags: $flags: expr,
            usage: $usage: literal,
            description: $description: literal
            $(, subcommands: [$($node: expr),* $(,)?])?
            $(,)?
        ) => {{
            let (sub_nodes, node_list) = $crate::commands::meta::nodes::index_nodes(vec![$($($node),*)?]);
            ::std::sync::Arc::new($crate::commands::meta::nodes::CommandNode {
                name: String::from($name),
                aliases: vec![$(String::from($alias)),*],
                handler: Box::new(move |ctx| -> $crate::commands::meta::nodes::CommandResultOuter {
                    Box::pin($handler(ctx))
                }),
                sub_nodes,
                node_list,
                flags: $flags,
                group: $group,
                usage: $usage,
                description: $description,
            })
        }};
    }
}
