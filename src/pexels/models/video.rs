use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoFile {
    pub id: u32,
    pub quality: Option<String>,
    pub file_type: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub link: String,
}

/// A preview frame of a video.
///
/// The API nests a `videos` list inside each picture. It is usually empty but
/// is decoded as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoPicture {
    pub id: u32,
    pub picture: String,
    pub nr: u32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub url: String,
    pub image: String,
    /// Undocumented; kept verbatim.
    #[serde(default)]
    pub full_res: Option<Value>,
    /// Length in seconds.
    pub duration: f64,
    #[serde(default)]
    pub video_files: Vec<VideoFile>,
    #[serde(default)]
    pub video_pictures: Vec<VideoPicture>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSearchResult {
    pub page: u32,
    pub per_page: u32,
    pub total_results: u32,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularVideos {
    pub page: u32,
    pub per_page: u32,
    pub total_results: u32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn video_decodes_files_pictures_and_full_res() {
        let video: Video = serde_json::from_value(json!({
            "id": 2499611,
            "width": 1080,
            "height": 1920,
            "url": "https://www.pexels.com/video/2499611/",
            "image": "https://images.pexels.com/videos/2499611/free-video-2499611.jpg",
            "full_res": {"link": "https://example.com/full.mp4", "size": 1234},
            "tags": [],
            "duration": 22.5,
            "video_files": [
                {
                    "id": 125004,
                    "quality": "hd",
                    "file_type": "video/mp4",
                    "width": 1080,
                    "height": 1920,
                    "link": "https://player.vimeo.com/external/342571552.hd.mp4"
                },
                {
                    "id": 125005,
                    "quality": null,
                    "file_type": "video/mp4",
                    "width": null,
                    "height": null,
                    "link": "https://player.vimeo.com/external/342571552.m3u8"
                }
            ],
            "video_pictures": [
                {
                    "id": 308178,
                    "picture": "https://static-videos.pexels.com/videos/2499611/pictures/preview-0.jpg",
                    "nr": 0
                }
            ]
        }))
        .unwrap();

        assert_eq!(video.duration, 22.5);
        assert_eq!(video.video_files.len(), 2);
        assert_eq!(video.video_files[0].quality.as_deref(), Some("hd"));
        assert_eq!(video.video_files[1].width, None);
        assert_eq!(video.video_pictures[0].nr, 0);
        assert!(video.video_pictures[0].videos.is_empty());
        assert_eq!(video.full_res.unwrap()["size"], json!(1234));
    }

    #[test]
    fn missing_full_res_is_none() {
        let video: Video = serde_json::from_value(json!({
            "id": 1,
            "width": 1,
            "height": 1,
            "url": "u",
            "image": "i",
            "full_res": null,
            "duration": 3
        }))
        .unwrap();

        assert!(video.full_res.is_none());
        assert_eq!(video.duration, 3.0);
        assert!(video.video_files.is_empty());
    }
}
