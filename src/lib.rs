pub mod pexels;

pub use pexels::{
    Client, ClientBuilder, CuratedResult, Error, Photo, PhotoSource, PopularVideos, Result,
    SearchResult, Video, VideoFile, VideoPicture, VideoSearchResult,
};
