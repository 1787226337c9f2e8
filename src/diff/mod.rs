mod index;
mod source;

pub use index::DiffIndex;
pub use source::{
    DiffSource, FileDiffSource, GitDiffSource, HttpClient, ReqwestClient, UrlDiffSource,
    is_remote_url,
};
