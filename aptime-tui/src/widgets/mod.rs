//! Reusable widget components.

pub mod detail;
pub mod modal;
pub mod pagination;
pub mod search;

pub use detail::DetailPanel;
pub use modal::{centered_rect, ModalFrame};
pub use pagination::PaginationBar;
pub use search::SearchBar;
