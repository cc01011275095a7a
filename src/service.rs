mod base;
mod service_fn;
mod shared;

pub(crate) use base::Service;
pub(crate) use service_fn::service_fn;
pub(crate) use shared::SharedService;
