//! Picture-in-picture surface. Requests are asynchronous and may be rejected.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::{Error, Result};

pub trait PictureInPictureApi: Send + Sync {
    /// Whether the platform offers picture-in-picture at all
    fn is_supported(&self) -> bool;

    /// Whether the media element is currently the picture-in-picture element
    fn is_active(&self) -> bool;

    /// Ask the platform to move the media into picture-in-picture
    fn request(&self) -> BoxFuture<'static, Result<()>>;

    /// Ask the platform to leave picture-in-picture
    fn exit(&self) -> BoxFuture<'static, Result<()>>;
}

/// In-memory picture-in-picture that resolves immediately.
///
/// `reject_requests` makes every subsequent request fail, which is how tests
/// exercise the rejection path.
pub struct SimulatedPictureInPicture {
    supported: bool,
    active: Arc<AtomicBool>,
    reject: Arc<AtomicBool>,
}

impl SimulatedPictureInPicture {
    pub fn new() -> Self {
        SimulatedPictureInPicture {
            supported: true,
            active: Arc::new(AtomicBool::new(false)),
            reject: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn unsupported() -> Self {
        SimulatedPictureInPicture {
            supported: false,
            ..Self::new()
        }
    }

    pub fn reject_requests(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }
}

impl Default for SimulatedPictureInPicture {
    fn default() -> Self {
        Self::new()
    }
}

impl PictureInPictureApi for SimulatedPictureInPicture {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn request(&self) -> BoxFuture<'static, Result<()>> {
        if !self.supported {
            return future::ready(Err(Error::Unsupported(crate::Capability::PictureInPicture))).boxed();
        }
        if self.reject.load(Ordering::SeqCst) {
            return future::ready(Err(Error::PictureInPicture("request denied".to_string()))).boxed();
        }
        let active = self.active.clone();
        async move {
            active.store(true, Ordering::SeqCst);
            Ok(())
        }
        .boxed()
    }

    fn exit(&self) -> BoxFuture<'static, Result<()>> {
        let active = self.active.clone();
        async move {
            if !active.swap(false, Ordering::SeqCst) {
                return Err(Error::PictureInPicture("not in picture-in-picture".to_string()));
            }
            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_request_then_exit() {
        let p = SimulatedPictureInPicture::new();
        p.request().await.unwrap();
        assert!(p.is_active());
        p.exit().await.unwrap();
        assert!(!p.is_active());
    }

    #[tokio::test]
    async fn rejected_request_leaves_inactive() {
        let p = SimulatedPictureInPicture::new();
        p.reject_requests(true);
        assert!(matches!(p.request().await, Err(Error::PictureInPicture(_))));
        assert!(!p.is_active());
    }

    #[tokio::test]
    async fn unsupported_request_fails() {
        let p = SimulatedPictureInPicture::unsupported();
        assert!(!p.is_supported());
        assert!(p.request().await.is_err());
    }
}
