//! Selection data model: keys, selection sets, predicates and hit testing.

mod details;
mod key;
mod predicate;
mod selection;

pub use details::{ItemDetails, ItemDetailsLookup};
pub use key::{ItemKey, ListKeyProvider, Position, StableIdProvider};
pub use predicate::{
    PredicateFn, SelectAnything, SelectSingleAnything, SelectionPredicate, select_anything,
    select_single_anything,
};
pub use selection::{Polarity, Selection, SelectionSnapshot};
