//! The auth bridge: everything that talks to the external identity SDK.

pub mod auth_bridge;
pub mod credential;
pub mod location;
pub mod sdk;

pub use auth_bridge::{AuthBridge, BridgeState, CredentialHandler, Initialization, SdkWait};
pub use credential::{decode_credential, CREDENTIAL_PARAM};
pub use location::{MemoryLocation, PageLocation};
pub use sdk::{
    ButtonOptions, CredentialCallback, CredentialResponse, IdConfiguration, IdentitySdk,
    MountHandle, NoSdk, UxMode,
};
