pub mod photo;
pub mod video;

pub use photo::{CuratedResult, Photo, PhotoSource, SearchResult};
pub use video::{PopularVideos, Video, VideoFile, VideoPicture, VideoSearchResult};
