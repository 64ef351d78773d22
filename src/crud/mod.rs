//! List-view state: CRUD operations, pagination and table controls.

mod pagination;
mod state;
mod table;

pub use pagination::PaginationState;
pub use state::{CrudSnapshot, CrudState};
pub use table::{SearchDebouncer, SearchInput, TableState, SEARCH_DEBOUNCE};
