use crate::connection::Connection;
use crate::error::{CbamError, Result};
use crate::transport::{HttpTransport, RequestBody};
use bytes::Bytes;
use http::Method;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, instrument};

/// Catalog API layout exposed by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CatalogVersion {
    /// ETSI SOL005 package management
    #[default]
    Sol005,
    /// Legacy CBAM 18 catalog adapter
    V18,
}

impl CatalogVersion {
    pub const SUPPORTED: [&'static str; 2] = ["SOL005", "v18"];

    /// Select a version by its exact, case-sensitive tag.
    pub fn select(tag: &str) -> Result<Self> {
        match tag {
            "SOL005" => Ok(CatalogVersion::Sol005),
            "v18" => Ok(CatalogVersion::V18),
            _ => Err(CbamError::UnknownCatalogVersion {
                tag: tag.to_string(),
                supported: Self::SUPPORTED.to_vec(),
            }),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            CatalogVersion::Sol005 => "SOL005",
            CatalogVersion::V18 => "v18",
        }
    }

    pub fn base_path(&self) -> &'static str {
        match self {
            CatalogVersion::Sol005 => "/vnfpkgm/v1/vnf_packages",
            CatalogVersion::V18 => "/api/catalog/adapter/vnfpackages",
        }
    }

    pub fn package_path(&self, package_id: &str) -> String {
        format!("{}/{}", self.base_path(), package_id)
    }

    pub async fn list<T: HttpTransport>(
        &self,
        conn: &mut Connection<T>,
    ) -> Result<Value> {
        conn.get_json(self.base_path()).await
    }

    pub async fn get<T: HttpTransport>(
        &self,
        conn: &mut Connection<T>,
        package_id: &str,
    ) -> Result<Value> {
        conn.get_json(&self.package_path(package_id)).await
    }

    pub async fn delete<T: HttpTransport>(
        &self,
        conn: &mut Connection<T>,
        package_id: &str,
    ) -> Result<()> {
        conn.delete(&self.package_path(package_id)).await?;
        Ok(())
    }

    /// Onboard a VNF package and return the orchestrator's package resource.
    ///
    /// SOL005 creates an empty package resource and then uploads the zip as
    /// its content. When the upload fails the created id is reported in
    /// [`CbamError::OnboardingUpload`]; nothing is rolled back. v18 uploads the
    /// package in a single multipart request.
    #[instrument(
        level = "debug",
        skip(self, conn, package),
        fields(version = self.tag(), file = %package.file_name)
    )]
    pub async fn onboard<T: HttpTransport>(
        &self,
        conn: &mut Connection<T>,
        package: &VnfPackage,
    ) -> Result<Value> {
        match self {
            CatalogVersion::Sol005 => {
                let created =
                    conn.post_empty(self.base_path()).await?.json_value()?;
                let package_id = created
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or(CbamError::MissingField("id"))?
                    .to_string();
                info!("created VNF package resource {}", package_id);

                let upload = conn
                    .put_bytes(
                        &format!(
                            "{}/package_content",
                            self.package_path(&package_id)
                        ),
                        "application/zip",
                        package.data.clone(),
                    )
                    .await;
                if let Err(e) = upload {
                    return Err(CbamError::OnboardingUpload {
                        package_id,
                        source: Box::new(e),
                    });
                }
                Ok(created)
            }
            CatalogVersion::V18 => {
                conn.send_json(
                    Method::POST,
                    self.base_path(),
                    RequestBody::Multipart {
                        field: "content".to_string(),
                        file_name: package.file_name.clone(),
                        data: package.data.clone(),
                    },
                )
                .await
            }
        }
    }
}

impl FromStr for CatalogVersion {
    type Err = CbamError;

    fn from_str(s: &str) -> Result<Self> {
        Self::select(s)
    }
}

impl fmt::Display for CatalogVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for CatalogVersion {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

impl<'de> Deserialize<'de> for CatalogVersion {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Self::select(&tag).map_err(serde::de::Error::custom)
    }
}

/// A VNF package archive ready for upload.
#[derive(Debug, Clone)]
pub struct VnfPackage {
    pub file_name: String,
    pub data: Bytes,
}

impl VnfPackage {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "package.zip".to_string());
        Ok(Self::new(file_name, data))
    }
}
