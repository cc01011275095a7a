use std::sync::Arc;

use super::base::Service;

/// Type-erased service shared between clones of bindings and functions
pub(crate) struct SharedService<Request, Response, Error>(
    pub(crate) Arc<dyn Service<Request, Response = Response, Error = Error> + Send + Sync>,
);

impl<Request, Response, Error> SharedService<Request, Response, Error> {
    #[inline]
    #[must_use]
    pub(crate) fn new<S>(service: S) -> Self
    where
        S: Service<Request, Response = Response, Error = Error> + Send + Sync + 'static,
    {
        Self(Arc::new(service))
    }
}

impl<Request, Response, Error> Clone for SharedService<Request, Response, Error> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<Request, Response, Error> Service<Request> for SharedService<Request, Response, Error> {
    type Response = Response;
    type Error = Error;

    #[inline]
    fn call(&self, request: Request) -> Result<Self::Response, Self::Error> {
        self.0.call(request)
    }
}

#[cfg(test)]
mod tests {
    use core::{
        convert::Infallible,
        sync::atomic::{AtomicU8, Ordering},
    };
    use std::sync::Arc;

    use super::SharedService;
    use crate::service::{service_fn, Service as _};

    #[test]
    fn test_clones_share_service() {
        let call_count = Arc::new(AtomicU8::new(0));
        let service = SharedService::new(service_fn({
            let call_count = call_count.clone();
            move |val: u8| {
                call_count.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(val + 1)
            }
        }));
        let cloned = service.clone();

        assert_eq!(service.call(1).unwrap(), 2);
        assert_eq!(cloned.call(2).unwrap(), 3);
        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }
}
