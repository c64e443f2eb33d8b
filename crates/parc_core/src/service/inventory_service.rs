//! Inventory use-case service.
//!
//! # Responsibility
//! - Provide room/machine registration and lookup entry points.
//! - Seed the demo inventory used by the CLI.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::{Entity, Machine, Room, RoomId};
use crate::repo::{MachineRepository, RepoResult, Repository};
use chrono::NaiveDate;
use log::info;

/// Request model for registering a machine in a room.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineRequest {
    pub reference: String,
    pub brand: String,
    pub price: f64,
    pub purchase_date: NaiveDate,
}

impl MachineRequest {
    pub fn new(
        reference: impl Into<String>,
        brand: impl Into<String>,
        price: f64,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            reference: reference.into(),
            brand: brand.into(),
            price,
            purchase_date,
        }
    }
}

/// Records created by `InventoryService::seed_demo_inventory`.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoInventory {
    pub rooms: Vec<Room>,
    pub machines: Vec<Machine>,
}

/// Use-case service over the room and machine repositories.
pub struct InventoryService<R, M>
where
    R: Repository<Room>,
    M: MachineRepository,
{
    rooms: R,
    machines: M,
}

impl<R, M> InventoryService<R, M>
where
    R: Repository<Room>,
    M: MachineRepository,
{
    pub fn new(rooms: R, machines: M) -> Self {
        Self { rooms, machines }
    }

    /// Creates and persists a room, returning it with its assigned id.
    pub fn register_room(
        &self,
        code: impl Into<String>,
        kind: impl Into<String>,
    ) -> RepoResult<Room> {
        let mut room = Room::new(code, kind);
        self.rooms.create(&mut room)?;
        Ok(room)
    }

    /// Creates and persists a machine owned by `room`.
    ///
    /// # Contract
    /// - `room` must already be persisted; otherwise validation fails and
    ///   nothing is written.
    pub fn register_machine(&self, room: &Room, request: &MachineRequest) -> RepoResult<Machine> {
        let mut machine = Machine::new(
            request.reference.clone(),
            request.brand.clone(),
            request.price,
            request.purchase_date,
            room,
        );
        self.machines.create(&mut machine)?;
        Ok(machine)
    }

    /// Loads a room together with its machines.
    pub fn room_with_machines(&self, room_id: RoomId) -> RepoResult<Option<Room>> {
        self.rooms.find_by_id(room_id)
    }

    /// Lists the machines of one room without loading the room itself.
    pub fn machines_in_room(&self, room_id: RoomId) -> RepoResult<Vec<Machine>> {
        self.machines.find_by_room(room_id)
    }

    pub fn all_rooms(&self) -> RepoResult<Vec<Room>> {
        self.rooms.find_all()
    }

    /// Creates two rooms and three machines bought on `purchase_date`.
    ///
    /// Rooms: `SA01` (Informatique) and `SA02` (Réseau). `MA01` and `MA02`
    /// go to `SA01`, `MA03` goes to `SA02`.
    pub fn seed_demo_inventory(&self, purchase_date: NaiveDate) -> RepoResult<DemoInventory> {
        let computing = self.register_room("SA01", "Informatique")?;
        let network = self.register_room("SA02", "Réseau")?;

        let machines = vec![
            self.register_machine(
                &computing,
                &MachineRequest::new("MA01", "HP", 6000.0, purchase_date),
            )?,
            self.register_machine(
                &computing,
                &MachineRequest::new("MA02", "Dell", 5500.0, purchase_date),
            )?,
            self.register_machine(
                &network,
                &MachineRequest::new("MA03", "Lenovo", 7000.0, purchase_date),
            )?,
        ];

        info!(
            "event=demo_seed module=service status=ok rooms=2 machines={} first_room_id={}",
            machines.len(),
            computing.id()
        );

        Ok(DemoInventory {
            rooms: vec![computing, network],
            machines,
        })
    }
}
