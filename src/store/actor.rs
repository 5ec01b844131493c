use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use tracing::info;

use super::models::{AccountPackage, Package, PackageRelease};
use super::patch::{ReleasePatch, ReleaseSelector};
use super::records::Records;
use crate::error::RegistryError;
use packbay_schema::PackageSelector;

#[derive(Debug)]
pub enum StoreMessage {
    /// Register a package (create-or-get by unique name).
    InsertPackage(String, Option<String>, RpcReplyPort<Package>),

    /// Publish a release row for an existing package.
    InsertRelease(
        String,
        String,
        RpcReplyPort<Result<PackageRelease, RegistryError>>,
    ),

    /// Resolve a release and apply a field-level patch, enforcing the
    /// at-most-one-latest invariant inside this single message.
    UpdateRelease(
        ReleaseSelector,
        ReleasePatch,
        RpcReplyPort<Result<(), RegistryError>>,
    ),

    /// Star a package for an account: association row and counter move together.
    StarPackage(
        String,
        PackageSelector,
        RpcReplyPort<Result<(), RegistryError>>,
    ),

    /// Soft-unstar: flips the association row and decrements the counter.
    UnstarPackage(
        String,
        PackageSelector,
        RpcReplyPort<Result<(), RegistryError>>,
    ),

    /// Look up a package by id or name.
    GetPackage(PackageSelector, RpcReplyPort<Option<Package>>),

    /// Look up a release by id.
    GetRelease(String, RpcReplyPort<Option<PackageRelease>>),

    /// List all releases of a package.
    ListReleases(String, RpcReplyPort<Vec<PackageRelease>>),

    /// Look up the account/package association row.
    GetAccountPackage(String, String, RpcReplyPort<Option<AccountPackage>>),
}

#[derive(Clone)]
pub struct StoreHandle {
    actor: ActorRef<StoreMessage>,
}

impl StoreHandle {
    pub async fn insert_package(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<Package, RegistryError> {
        ractor::call!(
            self.actor,
            StoreMessage::InsertPackage,
            name.to_string(),
            description
        )
        .map_err(|e| RegistryError::StoreUnavailable(format!("InsertPackage RPC failed: {e}")))
    }

    pub async fn insert_release(
        &self,
        package_id: &str,
        version: &str,
    ) -> Result<PackageRelease, RegistryError> {
        ractor::call!(
            self.actor,
            StoreMessage::InsertRelease,
            package_id.to_string(),
            version.to_string()
        )
        .map_err(|e| RegistryError::StoreUnavailable(format!("InsertRelease RPC failed: {e}")))?
    }

    pub async fn update_release(
        &self,
        selector: ReleaseSelector,
        patch: ReleasePatch,
    ) -> Result<(), RegistryError> {
        ractor::call!(self.actor, StoreMessage::UpdateRelease, selector, patch)
            .map_err(|e| RegistryError::StoreUnavailable(format!("UpdateRelease RPC failed: {e}")))?
    }

    pub async fn star_package(
        &self,
        account_id: &str,
        selector: PackageSelector,
    ) -> Result<(), RegistryError> {
        ractor::call!(
            self.actor,
            StoreMessage::StarPackage,
            account_id.to_string(),
            selector
        )
        .map_err(|e| RegistryError::StoreUnavailable(format!("StarPackage RPC failed: {e}")))?
    }

    pub async fn unstar_package(
        &self,
        account_id: &str,
        selector: PackageSelector,
    ) -> Result<(), RegistryError> {
        ractor::call!(
            self.actor,
            StoreMessage::UnstarPackage,
            account_id.to_string(),
            selector
        )
        .map_err(|e| RegistryError::StoreUnavailable(format!("UnstarPackage RPC failed: {e}")))?
    }

    pub async fn get_package(
        &self,
        selector: PackageSelector,
    ) -> Result<Option<Package>, RegistryError> {
        ractor::call!(self.actor, StoreMessage::GetPackage, selector)
            .map_err(|e| RegistryError::StoreUnavailable(format!("GetPackage RPC failed: {e}")))
    }

    pub async fn get_release(
        &self,
        package_release_id: &str,
    ) -> Result<Option<PackageRelease>, RegistryError> {
        ractor::call!(
            self.actor,
            StoreMessage::GetRelease,
            package_release_id.to_string()
        )
        .map_err(|e| RegistryError::StoreUnavailable(format!("GetRelease RPC failed: {e}")))
    }

    pub async fn list_releases(
        &self,
        package_id: &str,
    ) -> Result<Vec<PackageRelease>, RegistryError> {
        ractor::call!(
            self.actor,
            StoreMessage::ListReleases,
            package_id.to_string()
        )
        .map_err(|e| RegistryError::StoreUnavailable(format!("ListReleases RPC failed: {e}")))
    }

    pub async fn get_account_package(
        &self,
        account_id: &str,
        package_id: &str,
    ) -> Result<Option<AccountPackage>, RegistryError> {
        ractor::call!(
            self.actor,
            StoreMessage::GetAccountPackage,
            account_id.to_string(),
            package_id.to_string()
        )
        .map_err(|e| {
            RegistryError::StoreUnavailable(format!("GetAccountPackage RPC failed: {e}"))
        })
    }
}

struct StoreActor;

#[ractor::async_trait]
impl Actor for StoreActor {
    type Msg = StoreMessage;
    type State = Records;
    type Arguments = ();

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        (): Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!("StoreActor initialized");
        Ok(Records::new())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        records: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            StoreMessage::InsertPackage(name, description, reply) => {
                let _ = reply.send(records.insert_package(&name, description));
            }
            StoreMessage::InsertRelease(package_id, version, reply) => {
                let _ = reply.send(records.insert_release(&package_id, &version));
            }
            StoreMessage::UpdateRelease(selector, patch, reply) => {
                let _ = reply.send(records.update_release(&selector, &patch));
            }
            StoreMessage::StarPackage(account_id, selector, reply) => {
                let _ = reply.send(records.star_package(&account_id, &selector));
            }
            StoreMessage::UnstarPackage(account_id, selector, reply) => {
                let _ = reply.send(records.unstar_package(&account_id, &selector));
            }
            StoreMessage::GetPackage(selector, reply) => {
                let _ = reply.send(records.package_by_selector(&selector));
            }
            StoreMessage::GetRelease(package_release_id, reply) => {
                let _ = reply.send(records.release(&package_release_id));
            }
            StoreMessage::ListReleases(package_id, reply) => {
                let _ = reply.send(records.releases_for_package(&package_id));
            }
            StoreMessage::GetAccountPackage(account_id, package_id, reply) => {
                let _ = reply.send(records.account_package(&account_id, &package_id));
            }
        }
        Ok(())
    }
}

/// Spawn the store actor and return a cloneable handle.
///
/// Unnamed so tests can spawn independent stores within one process.
pub async fn spawn() -> StoreHandle {
    let (actor, _jh) = ractor::Actor::spawn(None, StoreActor, ())
        .await
        .expect("failed to spawn StoreActor");

    StoreHandle { actor }
}
