// Default service implementations, one per upstream API.

pub mod media_wiki;
pub mod realtime;
pub mod weird_gloop;

pub use media_wiki::MediaWikiService;
pub use realtime::RealtimeService;
pub use weird_gloop::WeirdGloopService;
