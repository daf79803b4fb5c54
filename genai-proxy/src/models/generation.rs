use crate::config::PromptDefaults;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// A file received from the caller, held in memory for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// A normalized generation request, one variant per HTTP route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationRequest {
    TextPrompt(String),
    Image {
        upload: Upload,
        prompt: Option<String>,
    },
    Document {
        upload: Upload,
        prompt: Option<String>,
    },
    Audio {
        upload: Upload,
        prompt: Option<String>,
    },
}

/// One unit of content sent to the upstream model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    InlineData {
        mime_type: String,
        /// Base64 (standard alphabet) payload.
        data: String,
    },
}

impl ContentPart {
    pub fn inline(upload: &Upload) -> Self {
        ContentPart::InlineData {
            mime_type: upload.mime_type.clone(),
            data: STANDARD.encode(&upload.data),
        }
    }
}

impl GenerationRequest {
    /// Route name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationRequest::TextPrompt(_) => "text",
            GenerationRequest::Image { .. } => "image",
            GenerationRequest::Document { .. } => "document",
            GenerationRequest::Audio { .. } => "audio",
        }
    }

    /// Builds the ordered parts: instruction text first, then the file.
    pub fn into_parts(self, defaults: &PromptDefaults) -> Vec<ContentPart> {
        let (upload, prompt, fallback) = match self {
            GenerationRequest::TextPrompt(prompt) => return vec![ContentPart::Text(prompt)],
            GenerationRequest::Image { upload, prompt } => (upload, prompt, &defaults.image),
            GenerationRequest::Document { upload, prompt } => {
                (upload, prompt, &defaults.document)
            }
            GenerationRequest::Audio { upload, prompt } => (upload, prompt, &defaults.audio),
        };

        let instruction = prompt
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| fallback.clone());

        vec![
            ContentPart::Text(instruction),
            ContentPart::inline(&upload),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> Upload {
        Upload {
            data: vec![0x89, b'P', b'N', b'G'],
            mime_type: "image/png".to_string(),
        }
    }

    #[test]
    fn test_text_prompt_is_single_part() {
        let parts =
            GenerationRequest::TextPrompt("Hello".into()).into_parts(&PromptDefaults::default());
        assert_eq!(parts, vec![ContentPart::Text("Hello".into())]);
    }

    #[test]
    fn test_image_uses_default_instruction() {
        let parts = GenerationRequest::Image {
            upload: png(),
            prompt: None,
        }
        .into_parts(&PromptDefaults::default());

        assert_eq!(
            parts,
            vec![
                ContentPart::Text("Jelaskan gambar ini".into()),
                ContentPart::InlineData {
                    mime_type: "image/png".into(),
                    data: "iVBORw==".into(),
                },
            ]
        );
    }

    #[test]
    fn test_explicit_prompt_overrides_default() {
        let parts = GenerationRequest::Image {
            upload: png(),
            prompt: Some("What is this?".into()),
        }
        .into_parts(&PromptDefaults::default());

        assert_eq!(parts[0], ContentPart::Text("What is this?".into()));
    }

    #[test]
    fn test_empty_prompt_falls_back_to_default() {
        let defaults = PromptDefaults {
            audio: "Transcribe this recording".into(),
            ..PromptDefaults::default()
        };
        let parts = GenerationRequest::Audio {
            upload: Upload {
                data: b"RIFF".to_vec(),
                mime_type: "audio/wav".into(),
            },
            prompt: Some(String::new()),
        }
        .into_parts(&defaults);

        assert_eq!(parts[0], ContentPart::Text("Transcribe this recording".into()));
        assert!(matches!(
            &parts[1],
            ContentPart::InlineData { mime_type, .. } if mime_type == "audio/wav"
        ));
    }

    #[test]
    fn test_document_default_instruction() {
        let parts = GenerationRequest::Document {
            upload: Upload {
                data: b"%PDF-1.7".to_vec(),
                mime_type: "application/pdf".into(),
            },
            prompt: None,
        }
        .into_parts(&PromptDefaults::default());

        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[0],
            ContentPart::Text("Buat ringkasan dari dokumen berikut.".into())
        );
    }
}
