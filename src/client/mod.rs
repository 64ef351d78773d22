//! Client side of the admin backend: HTTP transport, session, REST
//! services and the service cache.

mod factory;
mod http;
mod image;
mod query;
mod service;
mod session;

pub use factory::ServiceFactory;
pub use http::{ApiClient, Credentials};
pub use image::{ImageFile, ImageService, ImageUploadResponse, IMAGE_ENDPOINT};
pub use query::{ExportFormat, QueryParams, SortOrder};
pub use service::{CrudService, PaginatedResponse, RestService, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use session::{
    FileSessionStore, MemorySessionStore, Session, SessionEvent, SessionStore, User, TOKEN_KEY,
    URL_BUSQUEDA_KEY, USER_KEY,
};

pub(crate) use session::lock;
