use std::thread;

use tokio::sync::{mpsc, oneshot};

use shared::types::{CustomPort, Pin, ScanProgress, Service};

use crate::store::error::{Result, StoreError};
use crate::store::pins::NewPin;
use crate::store::selections::PortSelections;
use crate::store::services::{Assignments, Categories};
use crate::store::DashboardStore;

/// Commands sent to the store thread
pub enum StoreCommand {
    GetCategories(oneshot::Sender<Categories>),
    SaveCategories(Categories, oneshot::Sender<Result<()>>),
    ResetCategories(oneshot::Sender<Result<Categories>>),
    GetAssignments(oneshot::Sender<Assignments>),
    SaveAssignments(Assignments, oneshot::Sender<Result<()>>),
    GetServices(oneshot::Sender<Vec<Service>>),
    SaveServices(Vec<Service>, oneshot::Sender<Result<Vec<Service>>>),
    DeleteService(String, oneshot::Sender<Result<()>>),
    GetCustomPorts(oneshot::Sender<Vec<CustomPort>>),
    SaveCustomPorts(Vec<CustomPort>, oneshot::Sender<Result<()>>),
    GetDeletedServices(oneshot::Sender<Vec<String>>),
    SaveDeletedServices(Vec<String>, oneshot::Sender<Result<()>>),
    ClearDeletedServices(oneshot::Sender<Result<()>>),
    GetPins(oneshot::Sender<Vec<Pin>>),
    AddPin(Box<NewPin>, oneshot::Sender<Result<Vec<Pin>>>),
    RemovePin(String, oneshot::Sender<Result<Vec<Pin>>>),
    SyncPins(Vec<Pin>, oneshot::Sender<Result<Vec<Pin>>>),
    GetPortSelections(oneshot::Sender<PortSelections>),
    SyncPortSelections(PortSelections, oneshot::Sender<Result<()>>),
    GetScanProgress(oneshot::Sender<ScanProgress>),
    Shutdown,
}

/// Handle to the thread that owns all document access.
///
/// Funnelling every operation through one thread serializes same-process
/// writers; the per-document file lock covers the external scan parser,
/// which writes into the same directory from another process.
#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    /// Spawn the store thread
    pub fn spawn(store: DashboardStore) -> Self {
        let (tx, mut rx) = mpsc::channel::<StoreCommand>(256);

        thread::spawn(move || {
            while let Some(cmd) = rx.blocking_recv() {
                match cmd {
                    StoreCommand::GetCategories(reply) => {
                        let _ = reply.send(store.get_categories());
                    }
                    StoreCommand::SaveCategories(categories, reply) => {
                        let _ = reply.send(store.save_categories(categories));
                    }
                    StoreCommand::ResetCategories(reply) => {
                        let _ = reply.send(store.reset_categories());
                    }
                    StoreCommand::GetAssignments(reply) => {
                        let _ = reply.send(store.get_assignments());
                    }
                    StoreCommand::SaveAssignments(assignments, reply) => {
                        let _ = reply.send(store.save_assignments(assignments));
                    }
                    StoreCommand::GetServices(reply) => {
                        let _ = reply.send(store.get_services());
                    }
                    StoreCommand::SaveServices(services, reply) => {
                        let _ = reply.send(store.save_services(services));
                    }
                    StoreCommand::DeleteService(title, reply) => {
                        let _ = reply.send(store.delete_service(&title));
                    }
                    StoreCommand::GetCustomPorts(reply) => {
                        let _ = reply.send(store.get_custom_ports());
                    }
                    StoreCommand::SaveCustomPorts(ports, reply) => {
                        let _ = reply.send(store.save_custom_ports(ports));
                    }
                    StoreCommand::GetDeletedServices(reply) => {
                        let _ = reply.send(store.get_deleted_services());
                    }
                    StoreCommand::SaveDeletedServices(deleted, reply) => {
                        let _ = reply.send(store.save_deleted_services(deleted));
                    }
                    StoreCommand::ClearDeletedServices(reply) => {
                        let _ = reply.send(store.clear_deleted_services());
                    }
                    StoreCommand::GetPins(reply) => {
                        let _ = reply.send(store.get_pins());
                    }
                    StoreCommand::AddPin(new, reply) => {
                        let _ = reply.send(store.add_pin(*new));
                    }
                    StoreCommand::RemovePin(title, reply) => {
                        let _ = reply.send(store.remove_pin(&title));
                    }
                    StoreCommand::SyncPins(pins, reply) => {
                        let _ = reply.send(store.sync_pins(pins));
                    }
                    StoreCommand::GetPortSelections(reply) => {
                        let _ = reply.send(store.get_port_selections());
                    }
                    StoreCommand::SyncPortSelections(selections, reply) => {
                        let _ = reply.send(store.sync_port_selections(selections));
                    }
                    StoreCommand::GetScanProgress(reply) => {
                        let _ = reply.send(store.scan_progress());
                    }
                    StoreCommand::Shutdown => {
                        tracing::info!("Store thread shutting down");
                        break;
                    }
                }
            }
        });

        Self { tx }
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> StoreCommand,
    ) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| StoreError::Closed)?;
        rx.await.map_err(|_| StoreError::Closed)
    }

    pub async fn get_categories(&self) -> Result<Categories> {
        self.request(StoreCommand::GetCategories).await
    }

    pub async fn save_categories(&self, categories: Categories) -> Result<()> {
        self.request(|reply| StoreCommand::SaveCategories(categories, reply))
            .await?
    }

    pub async fn reset_categories(&self) -> Result<Categories> {
        self.request(StoreCommand::ResetCategories).await?
    }

    pub async fn get_assignments(&self) -> Result<Assignments> {
        self.request(StoreCommand::GetAssignments).await
    }

    pub async fn save_assignments(&self, assignments: Assignments) -> Result<()> {
        self.request(|reply| StoreCommand::SaveAssignments(assignments, reply))
            .await?
    }

    pub async fn get_services(&self) -> Result<Vec<Service>> {
        self.request(StoreCommand::GetServices).await
    }

    /// Merge category assignments and persist to both storage locations
    pub async fn save_services(&self, services: Vec<Service>) -> Result<Vec<Service>> {
        self.request(|reply| StoreCommand::SaveServices(services, reply))
            .await?
    }

    pub async fn delete_service(&self, title: String) -> Result<()> {
        self.request(|reply| StoreCommand::DeleteService(title, reply))
            .await?
    }

    pub async fn get_custom_ports(&self) -> Result<Vec<CustomPort>> {
        self.request(StoreCommand::GetCustomPorts).await
    }

    pub async fn save_custom_ports(&self, ports: Vec<CustomPort>) -> Result<()> {
        self.request(|reply| StoreCommand::SaveCustomPorts(ports, reply))
            .await?
    }

    pub async fn get_deleted_services(&self) -> Result<Vec<String>> {
        self.request(StoreCommand::GetDeletedServices).await
    }

    pub async fn save_deleted_services(&self, deleted: Vec<String>) -> Result<()> {
        self.request(|reply| StoreCommand::SaveDeletedServices(deleted, reply))
            .await?
    }

    pub async fn clear_deleted_services(&self) -> Result<()> {
        self.request(StoreCommand::ClearDeletedServices).await?
    }

    pub async fn get_pins(&self) -> Result<Vec<Pin>> {
        self.request(StoreCommand::GetPins).await
    }

    pub async fn add_pin(&self, new: NewPin) -> Result<Vec<Pin>> {
        self.request(|reply| StoreCommand::AddPin(Box::new(new), reply))
            .await?
    }

    pub async fn remove_pin(&self, title: String) -> Result<Vec<Pin>> {
        self.request(|reply| StoreCommand::RemovePin(title, reply))
            .await?
    }

    pub async fn sync_pins(&self, pins: Vec<Pin>) -> Result<Vec<Pin>> {
        self.request(|reply| StoreCommand::SyncPins(pins, reply))
            .await?
    }

    pub async fn get_port_selections(&self) -> Result<PortSelections> {
        self.request(StoreCommand::GetPortSelections).await
    }

    pub async fn sync_port_selections(&self, selections: PortSelections) -> Result<()> {
        self.request(|reply| StoreCommand::SyncPortSelections(selections, reply))
            .await?
    }

    pub async fn get_scan_progress(&self) -> Result<ScanProgress> {
        self.request(StoreCommand::GetScanProgress).await
    }

    /// Shutdown the store thread
    pub async fn shutdown(&self) -> Result<()> {
        self.tx
            .send(StoreCommand::Shutdown)
            .await
            .map_err(|_| StoreError::Closed)
    }
}
