//! The poem corpus: static catalog, markup stripping and filesystem source.

use std::path::PathBuf;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::traits::{PoemSource, Result};

/// One poem in the catalog. `path` is the canonical English route; the slug
/// is its last segment.
#[derive(Debug, Clone, Copy)]
pub struct PoemEntry {
    pub title: &'static str,
    pub path: &'static str,
}

impl PoemEntry {
    pub fn slug(&self) -> &'static str {
        self.path.rsplit('/').next().unwrap_or(self.path)
    }
}

/// A chapter of the book: a key used in ids and filesystem paths, a display
/// title used for filtering, and its poems.
#[derive(Debug, Clone, Copy)]
pub struct Chapter {
    pub key: &'static str,
    pub title: &'static str,
    pub poems: &'static [PoemEntry],
}

/// Languages the book has been translated into.
pub fn languages() -> &'static [&'static str] {
    &["en", "ar", "bn", "es", "fr", "hi", "id", "ko", "ur", "zh"]
}

macro_rules! poems {
    ($(($title:literal, $path:literal)),+ $(,)?) => {
        &[$(PoemEntry { title: $title, path: $path }),+]
    };
}

/// The fixed, statically known catalog of chapters and poems.
pub fn catalog() -> &'static [Chapter] {
    &[
        Chapter {
            key: "salvation",
            title: "Salvation",
            poems: poems![
                ("Believe in God", "/salvation/believe-in-god"),
                ("Follow Jesus", "/salvation/follow-jesus"),
                ("Have Forgiveness", "/salvation/have-forgiveness"),
                ("Love One Another", "/salvation/love-one-another"),
                ("Be Generous", "/salvation/be-generous"),
                ("Have Faith", "/salvation/have-faith"),
                ("Call to Him", "/salvation/call-to-him"),
                ("Our Mission", "/salvation/our-mission"),
            ],
        },
        Chapter {
            key: "being-together",
            title: "Being Together",
            poems: poems![
                ("Make Peace", "/being-together/make-peace"),
                ("Reward Each Other", "/being-together/reward-each-other"),
                ("Trust Each Other", "/being-together/trust-each-other"),
                ("Be Understanding", "/being-together/be-understanding"),
                ("Follow The Doctor", "/being-together/follow-the-doctor"),
                ("Blame Yourself", "/being-together/blame-yourself"),
            ],
        },
        Chapter {
            key: "the-straight-path",
            title: "The Straight Path",
            poems: poems![
                ("Practice The Word", "/the-straight-path/practice-the-word"),
                ("Be Humble", "/the-straight-path/be-humble"),
                ("Respect Your Family", "/the-straight-path/respect-your-family"),
                ("Speak Wisely", "/the-straight-path/speak-wisely"),
                ("Judge Righteously", "/the-straight-path/judge-righteously"),
                ("Walk Straight", "/the-straight-path/walk-straight"),
                ("Control Yourself", "/the-straight-path/control-yourself"),
                ("Act Honorably", "/the-straight-path/act-honorably"),
                ("Use Moderation", "/the-straight-path/use-moderation"),
                ("Be Grateful", "/the-straight-path/be-grateful"),
                ("Work In Peace", "/the-straight-path/work-in-peace"),
                ("Act In Secret", "/the-straight-path/act-in-secret"),
            ],
        },
        Chapter {
            key: "the-way",
            title: "The Way",
            poems: poems![
                ("Blessed Costs", "/the-way/blessed-costs"),
                ("Spread The Word", "/the-way/spread-the-word"),
                ("Mind The Times", "/the-way/mind-the-times"),
                ("Seek Not Earth", "/the-way/seek-not-earth"),
                ("Do Good", "/the-way/do-good"),
                ("Go His Way", "/the-way/go-his-way"),
                ("Hope For A New Life", "/the-way/hope-for-a-new-life"),
                ("Fear Him", "/the-way/fear-him"),
            ],
        },
        Chapter {
            key: "the-people",
            title: "The People",
            poems: poems![
                ("His Servants", "/the-people/his-servants"),
                ("One Book", "/the-people/one-book"),
                ("One Church", "/the-people/one-church"),
            ],
        },
        Chapter {
            key: "authority",
            title: "Authority",
            poems: poems![
                ("Claim God's House", "/authority/claim-gods-house"),
                ("The Law-Bringer", "/authority/the-law-bringer"),
                ("Like A King", "/authority/like-a-king"),
                ("Penalty And Mercy", "/authority/penalty-and-mercy"),
                ("Never Violate Another", "/authority/never-violate-another"),
            ],
        },
        Chapter {
            key: "his-design",
            title: "His Design",
            poems: poems![
                ("Have Courage", "/his-design/have-courage"),
                ("Choose Freely", "/his-design/choose-freely"),
                ("Value The Weight", "/his-design/value-the-weight"),
            ],
        },
        Chapter {
            key: "substances-and-health",
            title: "Substances and Health",
            poems: poems![
                ("Stay Healthy", "/substances-and-health/stay-healthy"),
                ("Don't Love Poison", "/substances-and-health/dont-love-poison"),
                ("Use Right", "/substances-and-health/use-right"),
            ],
        },
        Chapter {
            key: "suffering",
            title: "Suffering",
            poems: poems![
                ("Endure Affliction", "/suffering/endure-affliction"),
                ("Escape The Fire", "/suffering/escape-the-fire"),
                ("Cry No More", "/suffering/cry-no-more"),
                ("Be Not Weak", "/suffering/be-not-weak"),
                ("Beware Of Carnage", "/suffering/beware-of-carnage"),
            ],
        },
        Chapter {
            key: "worry-and-painful-thoughts",
            title: "Worry and Painful Thoughts",
            poems: poems![
                (
                    "Peaceful Thoughts",
                    "/worry-and-painful-thoughts/peaceful-thoughts"
                ),
                (
                    "Peace With Less",
                    "/worry-and-painful-thoughts/peace-with-less"
                ),
                ("Dark Feelings", "/worry-and-painful-thoughts/dark-feelings"),
                ("Temptations", "/worry-and-painful-thoughts/temptations"),
            ],
        },
        Chapter {
            key: "evildoers-and-wicked-people",
            title: "Evildoers and Wicked People",
            poems: poems![
                ("Being Hated", "/evildoers-and-wicked-people/being-hated"),
                ("Evil People", "/evildoers-and-wicked-people/evil-people"),
                (
                    "The Slave Owner",
                    "/evildoers-and-wicked-people/the-slave-owner"
                ),
            ],
        },
    ]
}

static FRONT_MATTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---.*?---\n").expect("valid front matter pattern"));
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Reduce poem markup to plain text: drop the leading `---` front-matter
/// block, replace tag-like markup with spaces and collapse whitespace.
pub fn extract_plain_text(raw: &str) -> String {
    let without_front_matter = FRONT_MATTER.replace(raw, "");
    let without_tags = MARKUP_TAG.replace_all(&without_front_matter, " ");
    WHITESPACE.replace_all(&without_tags, " ").trim().to_string()
}

/// Poem source reading `page.mdx` files from the content tree on disk.
///
/// English poems live at `{root}/{chapter}/{slug}/page.mdx`; translations add
/// a language directory: `{root}/{language}/{chapter}/{slug}/page.mdx`.
pub struct FsPoemSource {
    root: PathBuf,
}

impl FsPoemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn poem_path(&self, language: &str, chapter_key: &str, slug: &str) -> PathBuf {
        let mut path = self.root.clone();
        if language != "en" {
            path.push(language);
        }
        path.push(chapter_key);
        path.push(slug);
        path.push("page.mdx");
        path
    }
}

#[async_trait]
impl PoemSource for FsPoemSource {
    async fn load(&self, language: &str, chapter_key: &str, slug: &str) -> Result<Option<String>> {
        let path = self.poem_path(language, chapter_key, slug);
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            // Anything unreadable is treated as absent; the indexer logs the
            // skip and continues with a partial corpus.
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Poem content not readable");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn extract_strips_front_matter_tags_and_whitespace() {
        let raw = "---\ntitle: Have Faith\n---\n<PoemLayout>\n  <Stanza>\n    Faith is a gift\n  </Stanza>\n</PoemLayout>\n";
        assert_eq!(extract_plain_text(raw), "Faith is a gift");
    }

    #[test]
    fn extract_keeps_text_without_front_matter() {
        assert_eq!(extract_plain_text("  plain   text\n\nhere "), "plain text here");
    }

    #[test]
    fn extract_does_not_drop_mid_document_rules() {
        // A `---` block only counts as front matter at the very start.
        let raw = "First stanza\n---\nSecond stanza\n---\n";
        assert_eq!(extract_plain_text(raw), "First stanza --- Second stanza ---");
    }

    #[test]
    fn catalog_slugs_and_ids_are_unique() {
        let mut ids = HashSet::new();
        for language in languages() {
            for chapter in catalog() {
                for poem in chapter.poems {
                    let id = format!("{language}-{}-{}", chapter.key, poem.slug());
                    assert!(ids.insert(id), "duplicate document id in catalog");
                }
            }
        }
        // 60 poems x 10 languages
        assert_eq!(ids.len(), 600);
    }

    #[test]
    fn poem_paths_start_with_chapter_key() {
        for chapter in catalog() {
            for poem in chapter.poems {
                assert!(
                    poem.path.starts_with(&format!("/{}/", chapter.key)),
                    "poem path {} does not match chapter key {}",
                    poem.path,
                    chapter.key
                );
            }
        }
    }

    #[test]
    fn fs_source_builds_language_prefixed_paths() {
        let source = FsPoemSource::new("/content");
        assert_eq!(
            source.poem_path("en", "salvation", "have-faith"),
            PathBuf::from("/content/salvation/have-faith/page.mdx")
        );
        assert_eq!(
            source.poem_path("fr", "salvation", "have-faith"),
            PathBuf::from("/content/fr/salvation/have-faith/page.mdx")
        );
    }

    #[tokio::test]
    async fn fs_source_missing_poem_is_none() {
        let source = FsPoemSource::new("/nonexistent-content-root");
        let loaded = source.load("en", "salvation", "have-faith").await.unwrap();
        assert!(loaded.is_none());
    }
}
