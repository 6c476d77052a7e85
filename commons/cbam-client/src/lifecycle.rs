use crate::catalog::VnfPackage;
use crate::client::CbamClient;
use crate::error::{CbamError, Result};
use crate::json_input::{JsonInput, normalize_json_input};
use crate::models::{CreateVnfRequest, TerminateVnfRequest, VnfInstance};
use crate::transport::HttpTransport;
use serde_json::Value;
use tracing::{info, instrument};

pub const VNF_INSTANCES_PATH: &str = "/vnflcm/v1/vnf_instances";

fn instance_path(vnf_id: &str) -> String {
    format!("{}/{}", VNF_INSTANCES_PATH, vnf_id)
}

impl<T: HttpTransport> CbamClient<T> {
    #[instrument(level = "debug", skip(self, description))]
    pub async fn create_vnf(
        &mut self,
        vnfd_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<VnfInstance> {
        let mut request = CreateVnfRequest::new(vnfd_id, name);
        if let Some(description) = description {
            request = request.with_description(description);
        }
        let vnf: VnfInstance = self
            .connection_mut()
            .post_json(VNF_INSTANCES_PATH, &request)
            .await?
            .json()?;
        info!("created VNF {} ({})", vnf.id, vnf.vnf_instance_name);
        Ok(vnf)
    }

    pub async fn get_vnf(&mut self, vnf_id: &str) -> Result<VnfInstance> {
        self.connection_mut()
            .get(&instance_path(vnf_id))
            .await?
            .json()
    }

    pub async fn get_vnfs(&mut self) -> Result<Vec<VnfInstance>> {
        self.connection_mut().get(VNF_INSTANCES_PATH).await?.json()
    }

    /// First instance whose `vnfInstanceName` matches exactly.
    pub async fn get_vnf_by_name(&mut self, name: &str) -> Result<VnfInstance> {
        self.get_vnfs()
            .await?
            .into_iter()
            .find(|vnf| vnf.vnf_instance_name == name)
            .ok_or_else(|| {
                CbamError::NotFound(format!(
                    "No VNF with name '{}' was found.",
                    name
                ))
            })
    }

    /// PATCH the instance; returns the response document (`null` when the
    /// orchestrator answers with an empty body).
    pub async fn modify_vnf(
        &mut self,
        vnf_id: &str,
        modifications: &JsonInput,
    ) -> Result<Value> {
        let json = normalize_json_input(modifications)?;
        self.connection_mut()
            .patch_json(&instance_path(vnf_id), json)
            .await?
            .json_value()
    }

    #[instrument(level = "debug", skip(self, request))]
    pub async fn instantiate_vnf(
        &mut self,
        vnf_id: &str,
        request: &JsonInput,
    ) -> Result<Value> {
        let json = normalize_json_input(request)?;
        let response = self
            .connection_mut()
            .send_raw_json(
                http::Method::POST,
                &format!("{}/instantiate", instance_path(vnf_id)),
                json,
            )
            .await?;
        info!("instantiation of VNF {} accepted", vnf_id);
        response.json_value()
    }

    #[instrument(level = "debug", skip(self, request))]
    pub async fn terminate_vnf(
        &mut self,
        vnf_id: &str,
        request: &TerminateVnfRequest,
    ) -> Result<Value> {
        let response = self
            .connection_mut()
            .post_json(
                &format!("{}/terminate", instance_path(vnf_id)),
                request,
            )
            .await?;
        info!("termination of VNF {} accepted", vnf_id);
        response.json_value()
    }

    pub async fn delete_vnf(&mut self, vnf_id: &str) -> Result<()> {
        self.connection_mut().delete(&instance_path(vnf_id)).await?;
        info!("deleted VNF {}", vnf_id);
        Ok(())
    }

    pub async fn get_vnfds(&mut self) -> Result<Value> {
        let catalog = self.catalog_version();
        catalog.list(self.connection_mut()).await
    }

    pub async fn get_vnfd(&mut self, package_id: &str) -> Result<Value> {
        let catalog = self.catalog_version();
        catalog.get(self.connection_mut(), package_id).await
    }

    pub async fn delete_vnfd(&mut self, package_id: &str) -> Result<()> {
        let catalog = self.catalog_version();
        catalog.delete(self.connection_mut(), package_id).await?;
        info!("deleted VNF package {}", package_id);
        Ok(())
    }

    pub async fn onboard_vnfd(
        &mut self,
        package: &VnfPackage,
    ) -> Result<Value> {
        let catalog = self.catalog_version();
        catalog.onboard(self.connection_mut(), package).await
    }
}
