//! Canonical byte trees.
//!
//! A byte tree is either a leaf of raw bytes or a node of ordered
//! children. Its encoding is the hash input of every Fiat–Shamir
//! challenge, so the framing is normative: one tag byte (1 leaf, 0 node),
//! a 32-bit big-endian count (bytes for a leaf, children for a node), then
//! the payload or the child encodings.

/// Leaf tag byte.
const TAG_LEAF: u8 = 1;
/// Node tag byte.
const TAG_NODE: u8 = 0;

/// A recursive leaf/node tree of bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ByteTree {
    /// Raw bytes.
    Leaf(Vec<u8>),
    /// Ordered children.
    Node(Vec<ByteTree>),
}

/// Errors reading a byte tree from its encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ByteTreeError {
    /// Tag byte other than 0 or 1
    #[error("Unknown byte tree tag {0:#04x} at offset {1}")]
    UnknownTag(u8, usize),
    /// Declared length or child count of zero
    #[error("Zero length at offset {0}")]
    ZeroLength(usize),
    /// Input ended before the declared content
    #[error("Truncated byte tree at offset {0}")]
    Truncated(usize),
    /// Bytes left over after the root tree
    #[error("{0} trailing bytes after byte tree")]
    TrailingBytes(usize),
}

impl ByteTree {
    /// A leaf holding `bytes`.
    #[must_use]
    pub fn leaf(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Leaf(bytes.into())
    }

    /// A node over `children`.
    #[must_use]
    pub fn node(children: Vec<ByteTree>) -> Self {
        Self::Node(children)
    }

    /// The canonical encoding.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Leaf(bytes) => {
                out.push(TAG_LEAF);
                out.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
                out.extend_from_slice(bytes);
            }
            Self::Node(children) => {
                out.push(TAG_NODE);
                out.extend_from_slice(&(children.len() as u32).to_be_bytes());
                for child in children {
                    child.write(out);
                }
            }
        }
    }

    /// Decodes a byte tree, rejecting trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ByteTreeError> {
        let (tree, used) = Self::read(bytes, 0)?;
        if used != bytes.len() {
            return Err(ByteTreeError::TrailingBytes(bytes.len() - used));
        }
        Ok(tree)
    }

    /// Reads one tree starting at `offset`; returns it and the offset
    /// just past it. Never allocates more than the input can back.
    fn read(bytes: &[u8], offset: usize) -> Result<(Self, usize), ByteTreeError> {
        let tag = *bytes.get(offset).ok_or(ByteTreeError::Truncated(offset))?;
        let len_bytes = bytes
            .get(offset + 1..offset + 5)
            .ok_or(ByteTreeError::Truncated(offset + 1))?;
        let count = u32::from_be_bytes(
            len_bytes
                .try_into()
                .map_err(|_| ByteTreeError::Truncated(offset + 1))?,
        ) as usize;
        if count == 0 {
            return Err(ByteTreeError::ZeroLength(offset + 1));
        }
        let body = offset + 5;
        match tag {
            TAG_LEAF => {
                let payload = bytes
                    .get(body..body + count)
                    .ok_or(ByteTreeError::Truncated(body))?;
                Ok((Self::Leaf(payload.to_vec()), body + count))
            }
            TAG_NODE => {
                let mut children = Vec::with_capacity(count.min(bytes.len() - body));
                let mut cursor = body;
                for _ in 0..count {
                    let (child, next) = Self::read(bytes, cursor)?;
                    children.push(child);
                    cursor = next;
                }
                Ok((Self::Node(children), cursor))
            }
            other => Err(ByteTreeError::UnknownTag(other, offset)),
        }
    }
}

impl From<&[u8]> for ByteTree {
    fn from(bytes: &[u8]) -> Self {
        Self::leaf(bytes)
    }
}
