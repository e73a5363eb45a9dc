/// Generate a router async method that resolves an adapter by venue name,
/// checks the capability accessor and forwards one call under the provider timeout.
///
/// The generated method takes `venue: &str` first, followed by the listed arguments.
macro_rules! venue_router_method {
    (
        $(#[$meta:meta])*
        method: $name:ident( $( $arg_ident:ident : $arg_ty:ty ),* ) -> $ret:ty,
        accessor: $accessor:ident,
        capability: $capability:expr,
        call: $call_name:ident( $( $call_arg:ident ),* )
    ) => {
        $(#[$meta])*
        #[cfg_attr(
            feature = "tracing",
            tracing::instrument(target = "marketsync::router", skip(self)),
        )]
        ///
        /// # Errors
        /// Returns `UnknownVenue` if no adapter is registered under `venue`,
        /// `Unsupported` if it lacks the capability, or the tagged adapter failure.
        pub async fn $name(
            &self,
            venue: &str,
            $( $arg_ident: $arg_ty ),*
        ) -> Result<$ret, marketsync_core::SyncError> {
            let adapter = self.adapter_named(venue)?;
            let capability = $capability.as_str();
            let provider = adapter
                .$accessor()
                .ok_or_else(|| marketsync_core::SyncError::unsupported(capability))?;
            Self::provider_call_with_timeout(
                adapter.name(),
                capability,
                self.cfg.provider_timeout,
                provider.$call_name($( $call_arg ),*),
            )
            .await
            .map_err(|e| $crate::core::tag_transport(adapter.name(), capability, e))
        }
    };
}

pub(crate) use venue_router_method;
