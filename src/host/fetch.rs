//! Sequential slice download and reassembly.

use super::{HostDocument, HostFile};
use crate::error::{Error, Result};
use crate::options::ExtractOptions;
use std::time::Duration;

/// Downloads a host file slice by slice into one contiguous buffer.
///
/// Slices are requested strictly one at a time; the next request is only
/// issued once the previous slice arrived. Each slice is stored at the index
/// the host reported for it, so reassembly never depends on request order.
#[derive(Debug, Clone, Default)]
pub struct ChunkedFetcher {
    slice_size: u32,
    slice_timeout: Option<Duration>,
}

impl ChunkedFetcher {
    /// Create a fetcher from extraction options.
    pub fn new(options: &ExtractOptions) -> Self {
        Self {
            slice_size: options.slice_size,
            slice_timeout: options.slice_timeout,
        }
    }

    /// Open the host document and download it.
    ///
    /// Returns `None` when the file cannot be opened, is empty, or any slice
    /// fails. Failures are logged, not returned.
    pub async fn fetch_document(&self, host: &dyn HostDocument) -> Option<Vec<u8>> {
        match host.open_file(self.slice_size).await {
            Ok(file) => self.fetch(file).await,
            Err(e) => {
                log::warn!("Failed to get file: {}", e);
                None
            }
        }
    }

    /// Download every slice of an open file, then close it.
    ///
    /// The handle is closed exactly once, whatever the outcome.
    pub async fn fetch(&self, mut file: Box<dyn HostFile>) -> Option<Vec<u8>> {
        let result = self.read_all(file.as_mut()).await;
        file.close().await;

        match result {
            Ok(bytes) if bytes.is_empty() => {
                log::warn!("No slices found in the file");
                None
            }
            Ok(bytes) => Some(bytes),
            Err(e) if e.is_transport() => {
                log::warn!("Error getting document slices: {}", e);
                None
            }
            Err(e) => {
                log::error!("Unexpected error while reading slices: {}", e);
                None
            }
        }
    }

    /// Download every slice of an open file without closing it.
    pub async fn read_all(&self, file: &mut dyn HostFile) -> Result<Vec<u8>> {
        let count = file.slice_count();
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut slots: Vec<Option<Vec<u8>>> = vec![None; count as usize];
        for request in 0..count {
            let slice = match self.slice_timeout {
                Some(limit) => tokio::time::timeout(limit, file.slice(request))
                    .await
                    .map_err(|_| Error::SliceTimeout(request))??,
                None => file.slice(request).await?,
            };
            if slice.index >= count {
                return Err(Error::SliceOutOfRange {
                    index: slice.index,
                    count,
                });
            }
            log::debug!("Received slice {} of {}", slice.index + 1, count);
            slots[slice.index as usize] = Some(slice.data);
        }

        let mut combined = Vec::new();
        for (index, slot) in slots.into_iter().enumerate() {
            let data = slot.ok_or(Error::MissingSlice(index as u32))?;
            combined.extend_from_slice(&data);
        }
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Slice;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serves fixed slices, optionally reporting a different index.
    struct Scripted {
        slices: Vec<Slice>,
        fail_at: Option<u32>,
        closes: Arc<AtomicUsize>,
    }

    impl Scripted {
        fn new(slices: Vec<Slice>) -> Self {
            Self {
                slices,
                fail_at: None,
                closes: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl HostFile for Scripted {
        fn slice_count(&self) -> u32 {
            self.slices.len() as u32
        }

        async fn slice(&mut self, index: u32) -> Result<Slice> {
            if self.fail_at == Some(index) {
                return Err(Error::HostTransport(format!("slice {} refused", index)));
            }
            Ok(self.slices[index as usize].clone())
        }

        async fn close(&mut self) {
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_reassembles_by_reported_index() {
        // The host answers request 0 with slice 1 and request 1 with slice 0.
        let mut file = Scripted::new(vec![
            Slice::new(1, b"world".to_vec()),
            Slice::new(0, b"hello ".to_vec()),
        ]);
        let fetcher = ChunkedFetcher::default();
        let bytes = fetcher.read_all(&mut file).await.unwrap();
        assert_eq!(bytes, b"hello world");
        assert_eq!(file.closes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_index() {
        let mut file = Scripted::new(vec![Slice::new(5, b"x".to_vec())]);
        let err = ChunkedFetcher::default().read_all(&mut file).await.unwrap_err();
        assert!(matches!(err, Error::SliceOutOfRange { index: 5, count: 1 }));
    }

    #[tokio::test]
    async fn test_duplicate_index_leaves_gap() {
        let mut file = Scripted::new(vec![
            Slice::new(0, b"a".to_vec()),
            Slice::new(0, b"b".to_vec()),
        ]);
        let err = ChunkedFetcher::default().read_all(&mut file).await.unwrap_err();
        assert!(matches!(err, Error::MissingSlice(1)));
    }

    #[tokio::test]
    async fn test_fetch_closes_once_on_success() {
        let file = Scripted::new(vec![
            Slice::new(0, b"ab".to_vec()),
            Slice::new(1, b"c".to_vec()),
        ]);
        let closes = Arc::clone(&file.closes);
        let bytes = ChunkedFetcher::default().fetch(Box::new(file)).await;
        assert_eq!(bytes.as_deref(), Some(&b"abc"[..]));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_closes_once_on_failure() {
        let mut file = Scripted::new(vec![
            Slice::new(0, b"a".to_vec()),
            Slice::new(1, b"b".to_vec()),
        ]);
        file.fail_at = Some(1);
        let closes = Arc::clone(&file.closes);
        assert_eq!(ChunkedFetcher::default().fetch(Box::new(file)).await, None);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_of_empty_file_closes_once() {
        let file = Scripted::new(Vec::new());
        let closes = Arc::clone(&file.closes);
        assert_eq!(ChunkedFetcher::default().fetch(Box::new(file)).await, None);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
