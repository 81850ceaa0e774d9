use gp_core::program::Material;

use crate::pool::TextureHandle;

/// A recorded GPU-style command.
#[derive(Clone, Debug)]
pub enum Command {
    /// Full-screen copy from `src` to `dst`, through `material` if any.
    Blit {
        src: TextureHandle,
        dst: TextureHandle,
        material: Option<Material>,
    },
}

/// Liste de commandes enregistrées, soumise au contexte en une fois.
///
/// # Example
/// ```
/// use gp_render::command::CommandBufferPool;
/// let mut pool = CommandBufferPool::default();
/// let cmd = pool.get("ASCIIPass");
/// assert_eq!(cmd.name(), "ASCIIPass");
/// assert!(cmd.is_empty());
/// pool.release(cmd);
/// ```
#[derive(Debug, Default)]
pub struct CommandBuffer {
    name: String,
    commands: Vec<Command>,
}

impl CommandBuffer {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record a blit. The material is snapshotted: later rebinds do not
    /// change what this command draws.
    pub fn blit(&mut self, src: TextureHandle, dst: TextureHandle, material: Option<&Material>) {
        self.commands.push(Command::Blit {
            src,
            dst,
            material: material.cloned(),
        });
    }

    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

/// Recycles command buffers across frames.
#[derive(Debug, Default)]
pub struct CommandBufferPool {
    free: Vec<CommandBuffer>,
    gets: u64,
    releases: u64,
}

impl CommandBufferPool {
    /// Fetch an empty buffer, reusing a released one when possible.
    pub fn get(&mut self, name: &str) -> CommandBuffer {
        self.gets += 1;
        let mut cmd = self.free.pop().unwrap_or_default();
        cmd.name.clear();
        cmd.name.push_str(name);
        cmd
    }

    /// Clear a buffer and keep it for reuse.
    pub fn release(&mut self, mut cmd: CommandBuffer) {
        self.releases += 1;
        cmd.clear();
        self.free.push(cmd);
    }

    /// Buffers fetched and not yet released.
    #[must_use]
    pub fn outstanding(&self) -> u64 {
        self.gets - self.releases
    }
}
