//! SeaORM entity models
//!
//! Database entities for PaperNest

mod paper;
mod library_entry;
mod tag;
mod paper_tag;

pub use paper::{
    join_list, split_list, PaperRecord, LIST_DELIMITER,
    Entity as PaperEntity,
    Model as Paper,
    ActiveModel as PaperActiveModel,
    Column as PaperColumn,
};

pub use library_entry::{
    Entity as LibraryEntity,
    Model as LibraryEntry,
    ActiveModel as LibraryActiveModel,
    Column as LibraryColumn,
};

pub use tag::{
    Entity as TagEntity,
    Model as Tag,
    ActiveModel as TagActiveModel,
    Column as TagColumn,
};

pub use paper_tag::{
    Entity as PaperTagEntity,
    Model as PaperTag,
    ActiveModel as PaperTagActiveModel,
    Column as PaperTagColumn,
};
