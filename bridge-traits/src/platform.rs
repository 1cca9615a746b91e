//! Thread-safety bounds that follow the target.
//!
//! On native targets a composed player and its children must be movable onto
//! whichever thread drives the host event loop, and a logger sink is shared
//! between the subscriber and the host. On `wasm32` everything runs on the
//! browser's single thread and wraps objects that are neither `Send` nor
//! `Sync`, so the bounds vanish there.

macro_rules! platform_marker {
    ($(#[$doc:meta])* $name:ident: $($bound:ident)+) => {
        $(#[$doc])*
        #[cfg(not(target_arch = "wasm32"))]
        pub trait $name: $($bound +)+ {}

        #[cfg(not(target_arch = "wasm32"))]
        impl<T: $($bound +)+> $name for T {}

        $(#[$doc])*
        #[cfg(target_arch = "wasm32")]
        pub trait $name {}

        #[cfg(target_arch = "wasm32")]
        impl<T> $name for T {}
    };
}

platform_marker!(
    /// `Send` on native targets, no bound on `wasm32`. Required of media elements.
    PlatformSend: Send
);

platform_marker!(
    /// `Send + Sync` on native targets, no bound on `wasm32`. Required of logger sinks.
    PlatformSendSync: Send Sync
);

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    fn assert_send<T: PlatformSend>() {}
    fn assert_send_sync<T: PlatformSendSync>() {}

    #[test]
    fn native_markers_cover_std_types() {
        assert_send::<String>();
        assert_send::<std::cell::Cell<u8>>();
        assert_send_sync::<std::sync::Arc<str>>();
    }
}
