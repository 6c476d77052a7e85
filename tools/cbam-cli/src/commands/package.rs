use crate::output::print_output;
use crate::types::{ConnectionArgs, PackageOperation};
use cbam_client::{CbamClient, HttpTransport, VnfPackage};

pub async fn handle_package_command(
    operation: &PackageOperation,
    conn: &ConnectionArgs,
) -> anyhow::Result<()> {
    // Check the archive before spending a token request on it
    if let PackageOperation::Onboard { file, .. } = operation {
        if !file.exists() {
            return Err(anyhow::anyhow!(
                "Package file '{}' not found",
                file.display()
            ));
        }
    }
    let mut client = conn.connect().await?;
    run_package_operation(operation, &mut client).await
}

pub async fn run_package_operation<T: HttpTransport>(
    operation: &PackageOperation,
    client: &mut CbamClient<T>,
) -> anyhow::Result<()> {
    match operation {
        PackageOperation::List { output } => {
            let packages = client.get_vnfds().await?;
            print_output(&packages, &output.output)
        }
        PackageOperation::Get { id, output } => {
            let package = client.get_vnfd(id).await?;
            print_output(&package, &output.output)
        }
        PackageOperation::Delete { id } => {
            client.delete_vnfd(id).await?;
            println!("VNF package '{}' deleted", id);
            Ok(())
        }
        PackageOperation::Onboard { file, output } => {
            let package = VnfPackage::from_path(file).await?;
            println!(
                "Onboarding {} ({} catalog)",
                package.file_name,
                client.catalog_version()
            );
            let created = client.onboard_vnfd(&package).await?;
            print_output(&created, &output.output)
        }
    }
}
