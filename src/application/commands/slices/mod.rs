mod service;

pub use service::{
    AddSliceCommand, ArticleSliceCommandService, EditSliceCommand, MoveSliceCommand,
    SliceDirection,
};
