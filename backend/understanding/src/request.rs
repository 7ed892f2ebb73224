//! Request construction: picture bytes in, chat-completions payload out.

use std::io::{Read, Seek, SeekFrom};

use base64::{engine::general_purpose::STANDARD, Engine};
use mathtutor_core::{EncodedImage, TutorError};
use serde::Serialize;

use crate::prompt::TUTOR_INSTRUCTION;

/// Every picture is labelled JPEG regardless of its real format.
pub const IMAGE_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Rewind `stream` to its start and base64 it to the end.
///
/// Fails with [`TutorError::Input`] if the stream cannot seek or read.
pub fn encode<R: Read + Seek>(stream: &mut R) -> Result<EncodedImage, TutorError> {
    stream.seek(SeekFrom::Start(0))?;
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw)?;
    Ok(EncodedImage::new(STANDARD.encode(&raw)))
}

/// The single user message: instruction text, then the picture.
pub fn build_messages(image: &EncodedImage) -> Vec<ChatMessage> {
    vec![ChatMessage {
        role: "user".to_string(),
        content: vec![
            ContentPart::Text {
                text: TUTOR_INSTRUCTION.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: format!("{IMAGE_DATA_URL_PREFIX}{}", image.as_str()),
                },
            },
        ],
    }]
}

pub fn build_request(model: &str, image: &EncodedImage) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: build_messages(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathtutor_core::ErrorKind;
    use std::io::{self, Cursor};

    struct Unseekable(Cursor<Vec<u8>>);

    impl Read for Unseekable {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.0.read(buf)
        }
    }

    impl Seek for Unseekable {
        fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
            Err(io::Error::new(io::ErrorKind::Unsupported, "pipe is not seekable"))
        }
    }

    #[test]
    fn test_encode_round_trips() {
        let samples: [&[u8]; 4] = [b"", b"\x89PNG\r\n\x1a\n", &[0xff, 0xd8, 0xff, 0xe0, 0x00], &[0u8; 1025]];
        for raw in samples {
            let encoded = encode(&mut Cursor::new(raw.to_vec())).unwrap();
            let decoded = STANDARD.decode(encoded.as_str()).unwrap();
            assert_eq!(decoded, raw);
        }
    }

    #[test]
    fn test_encode_rewinds_before_reading() {
        let mut cursor = Cursor::new(b"hello image".to_vec());
        cursor.seek(SeekFrom::End(0)).unwrap();
        let encoded = encode(&mut cursor).unwrap();
        assert_eq!(encoded.as_str(), STANDARD.encode(b"hello image"));
    }

    #[test]
    fn test_encode_unseekable_is_input_error() {
        let mut stream = Unseekable(Cursor::new(vec![1, 2, 3]));
        let err = encode(&mut stream).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_payload_shape() {
        let image = EncodedImage::new("QUJD".into());
        let messages = build_messages(&image);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");

        let texts: Vec<_> = messages[0]
            .content
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        let urls: Vec<_> = messages[0]
            .content
            .iter()
            .filter_map(|p| match p {
                ContentPart::ImageUrl { image_url } => Some(image_url.url.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec![TUTOR_INSTRUCTION]);
        assert_eq!(urls, vec!["data:image/jpeg;base64,QUJD"]);
    }

    #[test]
    fn test_instruction_identical_across_calls() {
        let a = build_messages(&EncodedImage::new("AAAA".into()));
        let b = build_messages(&EncodedImage::new("BBBB".into()));
        assert_eq!(a[0].content[0], b[0].content[0]);
    }

    #[test]
    fn test_request_wire_json() {
        let req = build_request("gpt-5", &EncodedImage::new("QUJD".into()));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-5");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"][0]["type"], "text");
        assert_eq!(json["messages"][0]["content"][0]["text"], TUTOR_INSTRUCTION);
        assert_eq!(json["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            json["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,QUJD"
        );
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
