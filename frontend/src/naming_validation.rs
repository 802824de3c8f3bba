//! Event-Source Relay Naming Validation
//!
//! Checks that relays created outside tests follow the `{source}_{event}_relay`
//! pattern and that no Manager/Service/Controller style types creep in.
