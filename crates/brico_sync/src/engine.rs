use std::collections::HashSet;
use std::sync::Arc;

use brico_core::backend::{ArticleBackend, ArticleFields};
use brico_core::types::{ArticleDraft, ImageDraft, SectionDraft};
use brico_core::Error;
use tracing::{debug, info};

use crate::error::SyncError;
use crate::progress::Progress;

/// Result of a successful synchronize run.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Id of the now-persisted article, freshly created or unchanged.
    pub article_id: String,
}

/// Reconciles an edited article draft against the backend's persisted
/// state, issuing the minimal create/update/delete calls in dependency
/// order: cover upload, article root, stale-section deletes, then each
/// draft section with its children.
///
/// Every remote call is awaited before the next one starts; the first
/// failure aborts the run and is returned with its step's context. A
/// failed run can leave partial remote state behind; re-running
/// recomputes the diff from live state and converges from there. Two
/// concurrent runs against the same article are not guarded against.
pub struct Synchronizer {
    backend: Arc<dyn ArticleBackend>,
}

impl Synchronizer {
    pub fn new(backend: Arc<dyn ArticleBackend>) -> Self {
        Self { backend }
    }

    pub async fn synchronize(
        &self,
        draft: &ArticleDraft,
        existing: Option<&str>,
        progress: &dyn Progress,
    ) -> Result<SyncOutcome, SyncError> {
        let cover_url = match &draft.cover_image {
            Some(path) => {
                progress.step("uploading cover image");
                let url = self
                    .backend
                    .upload_image(path)
                    .await
                    .map_err(|source| SyncError::CoverUpload { source })?;
                Some(url)
            }
            None => draft.cover_url.clone(),
        };

        let fields = ArticleFields {
            title: draft.title.clone(),
            summary: draft.summary.clone(),
            category: draft.category.clone(),
            cover_url,
        };

        let article_id = match existing {
            Some(id) => {
                progress.step("updating article");
                self.backend
                    .update_article(id, &fields)
                    .await
                    .map_err(|source| SyncError::Article {
                        action: "updating",
                        source,
                    })?;
                id.to_string()
            }
            None => {
                progress.step("creating article");
                self.backend
                    .create_article(&fields)
                    .await
                    .map_err(|source| SyncError::Article {
                        action: "creating",
                        source,
                    })?
            }
        };

        // Stale sections only exist in edit mode; a fresh article has
        // nothing remote to remove.
        if existing.is_some() {
            self.delete_stale_sections(&article_id, &draft.sections, progress)
                .await?;
        }

        for section in &draft.sections {
            self.sync_section(&article_id, section, progress).await?;
        }

        info!(
            "📄 Article {} synchronized ({} sections)",
            article_id,
            draft.sections.len()
        );
        Ok(SyncOutcome { article_id })
    }

    async fn delete_stale_sections(
        &self,
        article_id: &str,
        sections: &[SectionDraft],
        progress: &dyn Progress,
    ) -> Result<(), SyncError> {
        let remote = self
            .backend
            .list_sections(article_id)
            .await
            .map_err(|source| SyncError::SectionList {
                article_id: article_id.to_string(),
                source,
            })?;

        let kept: HashSet<&str> = sections.iter().filter_map(|s| s.id.persisted()).collect();
        for section in remote.iter().filter(|s| !kept.contains(s.id.as_str())) {
            progress.step("deleting removed section");
            debug!("🗑️ Deleting section {}", section.id);
            self.backend
                .delete_section(&section.id)
                .await
                .map_err(|source| SyncError::SectionDelete {
                    id: section.id.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    async fn sync_section(
        &self,
        article_id: &str,
        section: &SectionDraft,
        progress: &dyn Progress,
    ) -> Result<(), SyncError> {
        // A just-created section has no remote children to diff against.
        let (section_id, remote_paragraphs, remote_images) = match section.id.persisted() {
            None => {
                progress.step("creating section");
                let id = self
                    .backend
                    .create_section(article_id, &section.title, section.order_index)
                    .await
                    .map_err(|source| SyncError::Section {
                        title: section.title.clone(),
                        source,
                    })?;
                (id, Vec::new(), Vec::new())
            }
            Some(id) => {
                progress.step("updating section");
                self.backend
                    .update_section(id, &section.title, section.order_index)
                    .await
                    .map_err(|source| SyncError::Section {
                        title: section.title.clone(),
                        source,
                    })?;
                let detail = self.backend.get_section(id).await.map_err(|source| {
                    SyncError::SectionRead {
                        id: id.to_string(),
                        source,
                    }
                })?;
                (id.to_string(), detail.paragraphs, detail.images)
            }
        };

        // Deletions go out before any child write in the same scope.
        let kept: HashSet<&str> = section
            .paragraphs
            .iter()
            .filter_map(|p| p.id.persisted())
            .collect();
        for paragraph in remote_paragraphs
            .iter()
            .filter(|p| !kept.contains(p.id.as_str()))
        {
            progress.step("deleting removed paragraph");
            self.backend
                .delete_paragraph(&paragraph.id)
                .await
                .map_err(|source| SyncError::ParagraphDelete {
                    id: paragraph.id.clone(),
                    source,
                })?;
        }

        let kept: HashSet<&str> = section
            .images
            .iter()
            .filter_map(|i| i.id.persisted())
            .collect();
        for image in remote_images
            .iter()
            .filter(|i| !kept.contains(i.id.as_str()))
        {
            progress.step("deleting removed image");
            self.backend
                .delete_image(&image.id)
                .await
                .map_err(|source| SyncError::ImageDelete {
                    id: image.id.clone(),
                    source,
                })?;
        }

        for paragraph in &section.paragraphs {
            match paragraph.id.persisted() {
                None => {
                    progress.step("creating paragraph");
                    self.backend
                        .create_paragraph(&section_id, &paragraph.content, paragraph.order_index)
                        .await
                        .map_err(|source| SyncError::Paragraph {
                            section: section.title.clone(),
                            source,
                        })?;
                }
                Some(id) => {
                    progress.step("updating paragraph");
                    self.backend
                        .update_paragraph(id, &paragraph.content, paragraph.order_index)
                        .await
                        .map_err(|source| SyncError::Paragraph {
                            section: section.title.clone(),
                            source,
                        })?;
                }
            }
        }

        for image in &section.images {
            self.sync_image(&section_id, &section.title, image, progress)
                .await?;
        }

        Ok(())
    }

    async fn sync_image(
        &self,
        section_id: &str,
        section_title: &str,
        image: &ImageDraft,
        progress: &dyn Progress,
    ) -> Result<(), SyncError> {
        let image_error = |source| SyncError::Image {
            section: section_title.to_string(),
            source,
        };

        match image.id.persisted() {
            None => {
                // File-backed images upload first; URL-only ones (already
                // hosted elsewhere) persist as-is.
                let url = match (&image.file, &image.url) {
                    (Some(path), _) => {
                        progress.step("uploading section image");
                        self.backend
                            .upload_image(path)
                            .await
                            .map_err(image_error)?
                    }
                    (None, Some(url)) => url.clone(),
                    (None, None) => {
                        return Err(image_error(Error::Config(
                            "image draft carries neither a file nor a url".to_string(),
                        )))
                    }
                };
                progress.step("creating image");
                self.backend
                    .create_image(section_id, &url, image.alt.as_deref(), image.order_index)
                    .await
                    .map_err(image_error)?;
            }
            Some(id) => {
                let url = image.url.as_deref().ok_or_else(|| {
                    image_error(Error::Config(format!("persisted image {} has no url", id)))
                })?;
                progress.step("updating image");
                self.backend
                    .update_image(id, url, image.alt.as_deref(), image.order_index)
                    .await
                    .map_err(|source| SyncError::Image {
                        section: section_title.to_string(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brico_core::types::{ImageRecord, ParagraphRecord, SectionDetail, SectionRecord};
    use brico_core::{Identity, Result};
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every remote call in order and can be told to fail the
    /// nth occurrence of a given call kind.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Mutex<Vec<String>>,
        sections: Mutex<Vec<SectionRecord>>,
        details: Mutex<HashMap<String, SectionDetail>>,
        next_id: AtomicUsize,
        fail_at: Mutex<Option<(String, usize)>>,
    }

    impl RecordingBackend {
        fn with_sections(sections: Vec<SectionRecord>) -> Self {
            let backend = Self::default();
            *backend.sections.lock().unwrap() = sections;
            backend
        }

        fn put_detail(&self, detail: SectionDetail) {
            self.details
                .lock()
                .unwrap()
                .insert(detail.section.id.clone(), detail);
        }

        fn fail_on(&self, kind: &str, occurrence: usize) {
            *self.fail_at.lock().unwrap() = Some((kind.to_string(), occurrence));
        }

        fn record(&self, kind: &str, call: String) -> Result<()> {
            self.calls.lock().unwrap().push(call);
            let mut fail_at = self.fail_at.lock().unwrap();
            if let Some((fail_kind, remaining)) = fail_at.as_mut() {
                if fail_kind == kind {
                    *remaining -= 1;
                    if *remaining == 0 {
                        return Err(Error::Api {
                            status: 500,
                            message: format!("{} rejected", kind),
                        });
                    }
                }
            }
            Ok(())
        }

        fn mint(&self, prefix: &str) -> String {
            format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn position(&self, needle: &str) -> usize {
            self.calls()
                .iter()
                .position(|c| c.starts_with(needle))
                .unwrap_or_else(|| panic!("no call starting with {}", needle))
        }
    }

    #[async_trait]
    impl ArticleBackend for RecordingBackend {
        async fn upload_image(&self, path: &Path) -> Result<String> {
            self.record("upload", format!("upload:{}", path.display()))?;
            Ok(format!("https://cdn.test/{}", path.display()))
        }

        async fn create_article(&self, fields: &ArticleFields) -> Result<String> {
            self.record(
                "create_article",
                format!("create_article:{}:{:?}", fields.title, fields.cover_url),
            )?;
            Ok("art-new".to_string())
        }

        async fn update_article(&self, id: &str, fields: &ArticleFields) -> Result<()> {
            self.record("update_article", format!("update_article:{}:{}", id, fields.title))
        }

        async fn list_sections(&self, article_id: &str) -> Result<Vec<SectionRecord>> {
            self.record("list_sections", format!("list_sections:{}", article_id))?;
            Ok(self.sections.lock().unwrap().clone())
        }

        async fn create_section(
            &self,
            article_id: &str,
            title: &str,
            order_index: u32,
        ) -> Result<String> {
            self.record(
                "create_section",
                format!("create_section:{}:{}:{}", article_id, title, order_index),
            )?;
            Ok(self.mint("sec-new"))
        }

        async fn update_section(&self, id: &str, title: &str, order_index: u32) -> Result<()> {
            self.record(
                "update_section",
                format!("update_section:{}:{}:{}", id, title, order_index),
            )
        }

        async fn delete_section(&self, id: &str) -> Result<()> {
            self.record("delete_section", format!("delete_section:{}", id))
        }

        async fn get_section(&self, id: &str) -> Result<SectionDetail> {
            self.record("get_section", format!("get_section:{}", id))?;
            Ok(self
                .details
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .unwrap_or(SectionDetail {
                    section: SectionRecord {
                        id: id.to_string(),
                        title: String::new(),
                        order_index: 0,
                    },
                    paragraphs: Vec::new(),
                    images: Vec::new(),
                }))
        }

        async fn create_paragraph(
            &self,
            section_id: &str,
            content: &str,
            order_index: u32,
        ) -> Result<String> {
            self.record(
                "create_paragraph",
                format!("create_paragraph:{}:{}:{}", section_id, content, order_index),
            )?;
            Ok(self.mint("p-new"))
        }

        async fn update_paragraph(&self, id: &str, content: &str, order_index: u32) -> Result<()> {
            self.record(
                "update_paragraph",
                format!("update_paragraph:{}:{}:{}", id, content, order_index),
            )
        }

        async fn delete_paragraph(&self, id: &str) -> Result<()> {
            self.record("delete_paragraph", format!("delete_paragraph:{}", id))
        }

        async fn create_image(
            &self,
            section_id: &str,
            url: &str,
            _alt: Option<&str>,
            order_index: u32,
        ) -> Result<String> {
            self.record(
                "create_image",
                format!("create_image:{}:{}:{}", section_id, url, order_index),
            )?;
            Ok(self.mint("img-new"))
        }

        async fn update_image(
            &self,
            id: &str,
            url: &str,
            _alt: Option<&str>,
            order_index: u32,
        ) -> Result<()> {
            self.record("update_image", format!("update_image:{}:{}:{}", id, url, order_index))
        }

        async fn delete_image(&self, id: &str) -> Result<()> {
            self.record("delete_image", format!("delete_image:{}", id))
        }
    }

    fn draft(title: &str, sections: Vec<SectionDraft>) -> ArticleDraft {
        ArticleDraft {
            title: title.to_string(),
            summary: "summary".to_string(),
            category: "Bricolage".to_string(),
            cover_image: None,
            cover_url: None,
            sections,
        }
    }

    fn new_section(title: &str, order_index: u32) -> SectionDraft {
        SectionDraft {
            id: Identity::New,
            title: title.to_string(),
            order_index,
            paragraphs: Vec::new(),
            images: Vec::new(),
        }
    }

    fn persisted_section(id: &str, title: &str, order_index: u32) -> SectionDraft {
        SectionDraft {
            id: Identity::Persisted(id.to_string()),
            title: title.to_string(),
            order_index,
            paragraphs: Vec::new(),
            images: Vec::new(),
        }
    }

    fn paragraph(id: Identity, content: &str, order_index: u32) -> ParagraphDraft {
        ParagraphDraft {
            id,
            content: content.to_string(),
            order_index,
        }
    }

    fn section_record(id: &str, title: &str, order_index: u32) -> SectionRecord {
        SectionRecord {
            id: id.to_string(),
            title: title.to_string(),
            order_index,
        }
    }

    use brico_core::types::ParagraphDraft;
    use crate::progress::NoProgress;

    fn sync(backend: Arc<RecordingBackend>) -> Synchronizer {
        Synchronizer::new(backend)
    }

    #[tokio::test]
    async fn test_create_new_article_without_sections() {
        let backend = Arc::new(RecordingBackend::default());
        let outcome = sync(backend.clone())
            .synchronize(&draft("Guide perceuse", vec![]), None, &NoProgress)
            .await
            .unwrap();

        assert_eq!(outcome.article_id, "art-new");
        assert_eq!(backend.calls().len(), 1);
        assert!(backend.calls()[0].starts_with("create_article:Guide perceuse"));
    }

    #[tokio::test]
    async fn test_edit_adds_section_with_two_paragraphs() {
        let backend = Arc::new(RecordingBackend::default());
        let mut section = new_section("Intro", 0);
        section.paragraphs = vec![
            paragraph(Identity::New, "A", 0),
            paragraph(Identity::New, "B", 1),
        ];

        let outcome = sync(backend.clone())
            .synchronize(&draft("Guide", vec![section]), Some("art-1"), &NoProgress)
            .await
            .unwrap();

        assert_eq!(outcome.article_id, "art-1");
        let calls = backend.calls();
        assert_eq!(
            calls,
            vec![
                "update_article:art-1:Guide",
                "list_sections:art-1",
                "create_section:art-1:Intro:0",
                "create_paragraph:sec-new-1:A:0",
                "create_paragraph:sec-new-1:B:1",
            ]
        );
    }

    #[tokio::test]
    async fn test_removed_paragraph_deleted_before_update() {
        let backend = Arc::new(RecordingBackend::with_sections(vec![section_record(
            "sec-1", "Intro", 0,
        )]));
        backend.put_detail(SectionDetail {
            section: section_record("sec-1", "Intro", 0),
            paragraphs: vec![
                ParagraphRecord {
                    id: "p-1".to_string(),
                    content: "old".to_string(),
                    order_index: 0,
                },
                ParagraphRecord {
                    id: "p-2".to_string(),
                    content: "gone".to_string(),
                    order_index: 1,
                },
            ],
            images: Vec::new(),
        });

        let mut section = persisted_section("sec-1", "Intro", 0);
        section.paragraphs = vec![paragraph(Identity::Persisted("p-1".into()), "updated", 0)];

        sync(backend.clone())
            .synchronize(&draft("Guide", vec![section]), Some("art-1"), &NoProgress)
            .await
            .unwrap();

        let calls = backend.calls();
        assert!(calls.contains(&"delete_paragraph:p-2".to_string()));
        assert!(calls.contains(&"update_paragraph:p-1:updated:0".to_string()));
        assert!(!calls.iter().any(|c| c.starts_with("create_paragraph")));
        assert!(backend.position("delete_paragraph:p-2") < backend.position("update_paragraph:p-1"));
    }

    #[tokio::test]
    async fn test_image_with_file_uploads_and_url_only_does_not() {
        let backend = Arc::new(RecordingBackend::with_sections(vec![section_record(
            "sec-1", "Intro", 0,
        )]));

        let mut section = persisted_section("sec-1", "Intro", 0);
        section.images = vec![
            ImageDraft {
                id: Identity::New,
                url: None,
                alt: Some("drill".to_string()),
                order_index: 0,
                file: Some(PathBuf::from("drill.png")),
            },
            ImageDraft {
                id: Identity::New,
                url: Some("https://x/y.png".to_string()),
                alt: None,
                order_index: 1,
                file: None,
            },
        ];

        sync(backend.clone())
            .synchronize(&draft("Guide", vec![section]), Some("art-1"), &NoProgress)
            .await
            .unwrap();

        let calls = backend.calls();
        let uploads: Vec<_> = calls.iter().filter(|c| c.starts_with("upload:")).collect();
        assert_eq!(uploads, ["upload:drill.png"]);
        assert!(calls.contains(&"create_image:sec-1:https://cdn.test/drill.png:0".to_string()));
        assert!(calls.contains(&"create_image:sec-1:https://x/y.png:1".to_string()));
        assert!(backend.position("upload:drill.png") < backend.position("create_image:sec-1:https://cdn.test"));
    }

    #[tokio::test]
    async fn test_failure_mid_sequence_stops_the_run() {
        let backend = Arc::new(RecordingBackend::default());
        backend.fail_on("create_section", 2);

        let sections = vec![
            new_section("One", 0),
            new_section("Two", 1),
            new_section("Three", 2),
        ];

        let err = sync(backend.clone())
            .synchronize(&draft("Guide", sections), Some("art-1"), &NoProgress)
            .await
            .unwrap_err();

        match err {
            SyncError::Section { title, .. } => assert_eq!(title, "Two"),
            other => panic!("unexpected error: {}", other),
        }

        let calls = backend.calls();
        let creates: Vec<_> = calls
            .iter()
            .filter(|c| c.starts_with("create_section"))
            .collect();
        assert_eq!(creates.len(), 2);
        assert!(!calls.iter().any(|c| c.contains(":Three:")));
    }

    #[tokio::test]
    async fn test_stale_section_deleted_before_new_one_created() {
        let backend = Arc::new(RecordingBackend::with_sections(vec![section_record(
            "sec-old", "Old", 0,
        )]));

        sync(backend.clone())
            .synchronize(
                &draft("Guide", vec![new_section("Fresh", 0)]),
                Some("art-1"),
                &NoProgress,
            )
            .await
            .unwrap();

        assert!(backend.position("delete_section:sec-old") < backend.position("create_section:"));
    }

    #[tokio::test]
    async fn test_unchanged_draft_issues_no_creates_or_deletes() {
        let backend = Arc::new(RecordingBackend::with_sections(vec![section_record(
            "sec-1", "Intro", 0,
        )]));
        backend.put_detail(SectionDetail {
            section: section_record("sec-1", "Intro", 0),
            paragraphs: vec![ParagraphRecord {
                id: "p-1".to_string(),
                content: "A".to_string(),
                order_index: 0,
            }],
            images: vec![ImageRecord {
                id: "i-1".to_string(),
                url: "https://x/y.png".to_string(),
                alt: None,
                order_index: 0,
            }],
        });

        let mut section = persisted_section("sec-1", "Intro", 0);
        section.paragraphs = vec![paragraph(Identity::Persisted("p-1".into()), "A", 0)];
        section.images = vec![ImageDraft {
            id: Identity::Persisted("i-1".into()),
            url: Some("https://x/y.png".to_string()),
            alt: None,
            order_index: 0,
            file: None,
        }];
        let unchanged = draft("Guide", vec![section]);

        for _ in 0..2 {
            sync(backend.clone())
                .synchronize(&unchanged, Some("art-1"), &NoProgress)
                .await
                .unwrap();
        }

        assert!(!backend.calls().iter().any(|c| {
            c.starts_with("create_") || c.starts_with("delete_") || c.starts_with("upload")
        }));
    }

    #[tokio::test]
    async fn test_order_indices_follow_draft_positions() {
        let backend = Arc::new(RecordingBackend::default());
        let mut section = new_section("Intro", 0);
        section.paragraphs = vec![
            paragraph(Identity::New, "first", 0),
            paragraph(Identity::New, "second", 1),
            paragraph(Identity::New, "third", 2),
        ];

        sync(backend.clone())
            .synchronize(&draft("Guide", vec![section]), None, &NoProgress)
            .await
            .unwrap();

        let creates: Vec<_> = backend
            .calls()
            .into_iter()
            .filter(|c| c.starts_with("create_paragraph"))
            .collect();
        assert_eq!(
            creates,
            vec![
                "create_paragraph:sec-new-1:first:0",
                "create_paragraph:sec-new-1:second:1",
                "create_paragraph:sec-new-1:third:2",
            ]
        );
    }

    #[tokio::test]
    async fn test_cover_upload_failure_aborts_before_article_write() {
        let backend = Arc::new(RecordingBackend::default());
        backend.fail_on("upload", 1);

        let mut d = draft("Guide", vec![]);
        d.cover_image = Some(PathBuf::from("cover.png"));

        let err = sync(backend.clone())
            .synchronize(&d, None, &NoProgress)
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::CoverUpload { .. }));
        assert_eq!(backend.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_progress_labels_fire_in_step_order() {
        let backend = Arc::new(RecordingBackend::default());
        let mut section = new_section("Intro", 0);
        section.paragraphs = vec![paragraph(Identity::New, "A", 0)];

        let labels = Mutex::new(Vec::new());
        let observer = |label: &str| labels.lock().unwrap().push(label.to_string());

        sync(backend)
            .synchronize(&draft("Guide", vec![section]), None, &observer)
            .await
            .unwrap();

        assert_eq!(
            labels.lock().unwrap().as_slice(),
            ["creating article", "creating section", "creating paragraph"]
        );
    }
}
