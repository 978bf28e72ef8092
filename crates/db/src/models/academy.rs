//! Artistic genre and academy member models and DTOs.

use laurels_core::form::{clearable, Clearable, FieldKind, FieldSpec, FormEntity, SlugRule};
use laurels_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Artistic genres
// ---------------------------------------------------------------------------

/// A row from the `artistic_genres` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArtisticGenre {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGenre {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGenre {
    pub name: Option<String>,
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub description: Clearable<String>,
}

impl FormEntity for CreateGenre {
    const ENTITY: &'static str = "ArtisticGenre";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", FieldKind::Text).required().max_length(120),
        FieldSpec::new("slug", FieldKind::Slug).required().max_length(120),
        FieldSpec::new("description", FieldKind::LongText).max_length(4000),
    ];
    const SLUG: Option<SlugRule> = Some(SlugRule {
        target: "slug",
        source: "name",
    });
    type Update = UpdateGenre;
}

// ---------------------------------------------------------------------------
// Academy members
// ---------------------------------------------------------------------------

/// Optional social media links of an academy member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialMedia {
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub website: Option<String>,
    pub youtube: Option<String>,
    pub tiktok: Option<String>,
}

/// A row from the `academy_members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AcademyMember {
    pub id: DbId,
    pub name: String,
    pub genre_id: DbId,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub social_media: Option<Json<SocialMedia>>,
    pub achievements: Option<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An academy member joined with its genre name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AcademyMemberWithGenre {
    pub id: DbId,
    pub name: String,
    pub genre_id: DbId,
    pub genre_name: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub social_media: Option<Json<SocialMedia>>,
    pub achievements: Option<Vec<String>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAcademyMember {
    pub name: String,
    pub genre_id: DbId,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub social_media: Option<SocialMedia>,
    pub achievements: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAcademyMember {
    pub name: Option<String>,
    pub genre_id: Option<DbId>,
    #[serde(default, deserialize_with = "clearable")]
    pub bio: Clearable<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub image_url: Clearable<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub social_media: Clearable<SocialMedia>,
    #[serde(default, deserialize_with = "clearable")]
    pub achievements: Clearable<Vec<String>>,
}

impl FormEntity for CreateAcademyMember {
    const ENTITY: &'static str = "AcademyMember";
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("name", FieldKind::Text).required().max_length(200),
        FieldSpec::new("genre_id", FieldKind::Integer).required().min_value(1),
        FieldSpec::new("bio", FieldKind::LongText).max_length(8000),
        FieldSpec::new("image_url", FieldKind::Url).max_length(2048),
        FieldSpec::new("social_media", FieldKind::JsonObject),
        FieldSpec::new("achievements", FieldKind::StringList),
    ];
    type Update = UpdateAcademyMember;
}

/// Query parameters for `GET /api/v1/academy/members`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberListParams {
    pub genre_id: Option<DbId>,
}
