use chrono::{DateTime, Utc};
use serde::Deserialize;
use shared::{catalog::CatalogUser, track::TrackRecord};

// Internal structs for deserializing raw API responses
#[derive(Deserialize, Debug)]
pub(crate) struct ApiUser {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub permalink_url: String,
    pub track_count: Option<u64>,
}

impl From<ApiUser> for CatalogUser {
    fn from(user: ApiUser) -> Self {
        CatalogUser {
            username: user.username,
            id: user.id,
            permalink_url: user.permalink_url,
        }
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct ApiTrack {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permalink_url: String,
    pub duration: Option<u64>,
    pub playback_count: Option<u64>,
    pub likes_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub genre: Option<String>,
    pub tag_list: Option<String>,
    pub artwork_url: Option<String>,
}

impl From<ApiTrack> for TrackRecord {
    fn from(track: ApiTrack) -> Self {
        TrackRecord {
            id: Some(track.id),
            title: track.title,
            description: track.description.unwrap_or_default(),
            permalink_url: track.permalink_url,
            created_at: track.created_at,
            duration: track.duration,
            playback_count: track.playback_count,
            likes_count: track.likes_count,
            comment_count: track.comment_count,
            genre: track.genre,
            tag_list: track.tag_list,
            artwork_url: track.artwork_url,
        }
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct TrackPage {
    #[serde(default)]
    pub collection: Vec<ApiTrack>,
    pub next_href: Option<String>,
}
