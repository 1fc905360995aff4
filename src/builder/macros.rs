//! Macros for ergonomic machine construction.

/// Declare a control state hierarchy as a `Vec<StateNode>`.
///
/// A bare name is an atomic state; `Name => { ... }` is a compound state
/// with the nested declarations as children.
///
/// # Example
///
/// ```
/// use hfsm::states;
///
/// let states = states! {
///     Empty,
///     Loaded => {
///         Stopped,
///         Active => { Playing, Paused },
///     },
/// };
///
/// assert_eq!(states.len(), 2);
/// assert!(states[1].is_compound());
/// assert_eq!(states[1].children()[1].children()[0].name(), "Playing");
/// ```
#[macro_export]
macro_rules! states {
    () => {
        ::std::vec::Vec::<$crate::core::StateNode>::new()
    };

    (@acc [$($out:expr),*]) => {
        ::std::vec![$($out),*]
    };

    (@acc [$($out:expr),*] $name:ident => { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $crate::states!(
            @acc [$($out,)* $crate::core::StateNode::compound(stringify!($name), $crate::states!($($inner)*))]
            $($($rest)*)?
        )
    };

    (@acc [$($out:expr),*] $name:ident $(, $($rest:tt)*)?) => {
        $crate::states!(
            @acc [$($out,)* $crate::core::StateNode::atomic(stringify!($name))]
            $($($rest)*)?
        )
    };

    ($($body:tt)+) => {
        $crate::states!(@acc [] $($body)+)
    };
}
