use log::*;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawn, LocalSpawnExt};

use mime::Mime;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::*;

lazy_static! {
  /// Advisory picker filter.  The picker dialog offers only these types;
  /// a selection is not hard-rejected against the list.
  pub static ref ACCEPTED_IMAGE_TYPES: Vec<Mime> = vec![
    mime::IMAGE_PNG,
    mime::IMAGE_JPEG,
    "image/jpg".parse().expect("static mime"),
  ];
}

pub fn accepts(mime: &Mime) -> bool {
  ACCEPTED_IMAGE_TYPES.iter().any(|accepted| accepted == mime)
}

/// A locally selected image, not yet uploaded.
#[derive(Debug, Clone)]
pub struct AvatarFile {
  pub name: String,
  pub mime: Mime,
  pub path: PathBuf,
}

pub fn data_url(mime: &Mime, bytes: &[u8]) -> String {
  format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Converts a selected file into a displayable representation without a
/// network round trip.
pub trait FileReader {
  fn read_data_url(&self, file: AvatarFile) -> LocalBoxFuture<'static, Result<String>>;
}

/// Production reader: file bytes from disk, base64 data URL out.
pub struct DiskReader;

impl FileReader for DiskReader {
  fn read_data_url(&self, file: AvatarFile) -> LocalBoxFuture<'static, Result<String>> {
    Box::pin(async move {
      let bytes = async_std::fs::read(&file.path)
        .await
        .map_err(|err| Error::Decode(format!("{}: {}", file.path.display(), err)))?;
      Ok(data_url(&file.mime, &bytes))
    })
  }
}

/// The preview img element.  The edit form owns it and render copies the
/// src out, so dropping the form detaches every pending decode.
pub struct PreviewImage {
  src: RefCell<String>,
}

impl PreviewImage {
  pub fn new(src: &str) -> Rc<Self> {
    Rc::new(Self {
      src: RefCell::new(src.to_string()),
    })
  }

  pub fn src(&self) -> String {
    self.src.borrow().clone()
  }

  fn set_src(&self, src: String) {
    *self.src.borrow_mut() = src;
  }
}

/// One-shot decode per selection.  A superseding selection does not cancel
/// the previous decode; whichever decode resolves last writes the preview.
pub struct AvatarPreview {
  reader: Rc<dyn FileReader>,
  spawner: Rc<dyn LocalSpawn>,
  image: Rc<PreviewImage>,
}

impl AvatarPreview {
  pub fn mount(reader: Rc<dyn FileReader>, spawner: Rc<dyn LocalSpawn>, current_image: &str) -> Self {
    Self {
      reader,
      spawner,
      image: PreviewImage::new(current_image),
    }
  }

  pub fn image(&self) -> &Rc<PreviewImage> {
    &self.image
  }

  pub fn src(&self) -> String {
    self.image.src()
  }

  /// Start decoding a selection.  The result lands in the preview only
  /// while the preview is still mounted.
  pub fn load(&self, file: AvatarFile) {
    let name = file.name.clone();
    let target: Weak<PreviewImage> = Rc::downgrade(&self.image);
    let decode = self.reader.read_data_url(file);
    let task = async move {
      match decode.await {
        Ok(url) => match target.upgrade() {
          Some(image) => image.set_src(url),
          None => debug!("decode of {} finished after unmount", name),
        },
        Err(err) => {
          // nobody listens for decode failures.
          debug!("decode of {} failed: {}", name, err);
        },
      }
    };
    if let Err(err) = self.spawner.spawn_local(task) {
      error!("can't spawn decode task: {:?}", err);
    }
  }
}
