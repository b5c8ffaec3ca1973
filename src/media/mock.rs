use super::MediaHostService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockMediaHost {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    keys: Arc<Mutex<Vec<String>>>,
    content_types: Arc<Mutex<Vec<String>>>,
    base_url: String,
    upload_count: Arc<Mutex<usize>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockMediaHost {
    pub fn new() -> Self {
        Self {
            files: Arc::new(Mutex::new(HashMap::new())),
            keys: Arc::new(Mutex::new(Vec::new())),
            content_types: Arc::new(Mutex::new(Vec::new())),
            base_url: "https://mock-media.example.com".to_string(),
            upload_count: Arc::new(Mutex::new(0)),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Make every subsequent upload fail with the given message.
    pub fn with_failure(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn get_upload_count(&self) -> usize {
        *self.upload_count.lock().unwrap()
    }

    /// Keys uploaded so far, in arrival order.
    pub fn uploaded_keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }

    pub fn uploaded_content_types(&self) -> Vec<String> {
        self.content_types.lock().unwrap().clone()
    }

    pub fn get_files(&self) -> HashMap<String, Vec<u8>> {
        self.files.lock().unwrap().clone()
    }
}

impl Default for MockMediaHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaHostService for MockMediaHost {
    async fn upload_file(&self, key: &str, data: &[u8], content_type: &str) -> Result<String> {
        if let Some(message) = self.failure.lock().unwrap().as_ref() {
            return Err(Error::MediaHost(message.clone()));
        }

        let mut count = self.upload_count.lock().unwrap();
        *count += 1;

        self.keys.lock().unwrap().push(key.to_string());
        self.content_types
            .lock()
            .unwrap()
            .push(content_type.to_string());
        self.files
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());

        Ok(format!("{}/{}", self.base_url, key))
    }
}
