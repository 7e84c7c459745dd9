use std::path::Path;

use slotmap::SlotMap;
use tracing::{info, warn};

use crate::error::{Result, SceneError};
use crate::io::obj;

use super::Mesh;

slotmap::new_key_type! {
    /// Unique identifier for a mesh in a scene.
    pub struct MeshId;
}

/// Arena owning every surface in the session.
///
/// Meshes are addressed by generational ids, so a deleted mesh's id never
/// aliases a later one. Iteration and export follow insertion order.
#[derive(Debug, Default)]
pub struct Scene {
    meshes: SlotMap<MeshId, Mesh>,
    order: Vec<MeshId>,
}

impl Scene {
    /// Creates a new, empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Inserts a mesh and returns its ID.
    pub fn add(&mut self, mesh: Mesh) -> MeshId {
        let id = self.meshes.insert(mesh);
        self.order.push(id);
        info!(?id, meshes = self.meshes.len(), "added surface");
        id
    }

    /// Deletes a mesh and returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is not in the scene.
    pub fn remove(&mut self, id: MeshId) -> Result<Mesh> {
        let mesh = self
            .meshes
            .remove(id)
            .ok_or_else(|| SceneError::MeshNotFound(format!("{id:?}")))?;
        self.order.retain(|&other| other != id);
        info!(?id, meshes = self.meshes.len(), "removed surface");
        Ok(mesh)
    }

    /// Returns a reference to the mesh, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is not in the scene.
    pub fn get(&self, id: MeshId) -> Result<&Mesh> {
        self.meshes
            .get(id)
            .ok_or_else(|| SceneError::MeshNotFound(format!("{id:?}")).into())
    }

    /// Returns a mutable reference to the mesh, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh is not in the scene.
    pub fn get_mut(&mut self, id: MeshId) -> Result<&mut Mesh> {
        self.meshes
            .get_mut(id)
            .ok_or_else(|| SceneError::MeshNotFound(format!("{id:?}")).into())
    }

    /// Meshes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.order
            .iter()
            .filter_map(|&id| self.meshes.get(id).map(|m| (id, m)))
    }

    /// Rebuilds every mesh from its current inputs.
    ///
    /// Meshes that fail keep their previous geometry; the others are still
    /// rebuilt.
    ///
    /// # Errors
    ///
    /// Returns the first rebuild error after attempting every mesh.
    pub fn rebuild_all(&mut self) -> Result<()> {
        let mut first_error = None;
        for &id in &self.order {
            if let Some(mesh) = self.meshes.get_mut(id) {
                if let Err(e) = mesh.create() {
                    warn!(?id, "surface kept its previous geometry");
                    first_error.get_or_insert(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Renders every mesh as one OBJ document.
    #[must_use]
    pub fn export_obj(&self) -> String {
        obj::export_obj(self.iter().map(|(_, m)| m.geometry()))
    }

    /// Writes every mesh to `path` as OBJ, reporting success as a flag.
    pub fn save_obj(&self, path: &Path) -> bool {
        obj::save_obj(path, self.iter().map(|(_, m)| m.geometry()))
    }
}
