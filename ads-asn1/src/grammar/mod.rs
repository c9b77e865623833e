//! Table-driven grammar engine
//!
//! A [`Grammar`] is an immutable table `transitions[state][tag]` built once
//! per structure type. A [`Container`] holds everything one decode session
//! needs (current state, length stack, scratch TLV, object under
//! construction), and [`Asn1Decoder`] drives the container through the
//! table one TLV at a time.
//!
//! ```text
//! bytes -> Asn1Decoder reads TLV -> Grammar lookup -> Action mutates target
//!       -> loop until the outermost length is consumed -> target
//! ```
//!
//! Decoding is resumable: when the input ends in the middle of a TLV the
//! decoder returns [`DecodeStatus::NeedMoreData`] and every piece of state
//! needed to continue stays in the container.

pub mod actions;
pub mod config;
pub mod container;
pub mod decoder;
pub mod table;
pub mod transition;

pub use config::DecoderConfig;
pub use container::{Container, Tlv};
pub use decoder::{Asn1Decoder, DecodeStatus};
pub use table::Grammar;
pub use transition::{Action, ActionFn, Transition, ValueMode};

use std::fmt::Debug;

/// The state enumeration of one grammar
///
/// States are assigned ordinals `0..COUNT` used as table rows. Use the
/// [`states!`](crate::states) macro rather than implementing this by hand.
pub trait States: Copy + Eq + Debug + Send + Sync + 'static {
    /// Number of states
    const COUNT: usize;
    /// Initial state of every decode
    const START: Self;
    /// Terminal state
    const END: Self;

    /// Table row of this state
    fn ordinal(self) -> usize;

    /// Name used in logs and errors
    fn name(self) -> &'static str;

    /// Whether this is the terminal state
    fn is_end_state(self) -> bool {
        self == Self::END
    }
}

/// Declare a grammar state enumeration and implement [`States`] for it
///
/// ```rust
/// ads_asn1::states! {
///     /// States of a one-field grammar
///     pub enum DemoStates {
///         Start,
///         Sequence,
///         Value,
///         Last,
///     }
///     start = Start;
///     end = Last;
/// }
///
/// use ads_asn1::States;
/// assert_eq!(DemoStates::COUNT, 4);
/// assert_eq!(DemoStates::Value.name(), "Value");
/// ```
#[macro_export]
macro_rules! states {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident ),+ $(,)?
        }
        start = $start:ident;
        end = $end:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$variant_meta])* $variant ),+
        }

        impl $crate::grammar::States for $name {
            const COUNT: usize = [$(stringify!($variant)),+].len();
            const START: Self = $name::$start;
            const END: Self = $name::$end;

            fn ordinal(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }
        }
    };
}
