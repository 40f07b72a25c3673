//! The CSYE6225 cloud architecture with its CI/CD pipeline.
//!
//! Infrastructure is provisioned with Pulumi and application images are
//! baked by GitHub Actions. Traffic flows from Route53 through the load
//! balancer to an auto-scaling group of EC2 instances running the Node.js
//! API, which stores data in RDS and S3 and publishes events to SNS for a
//! Lambda mailer.

use stratus::{
    Canvas, StratusError,
    semantic::{Category, Header, Link, NodeRef},
};

const PACKER_ICON: &str = "my_resources/packer.svg";
const PULUMI_ICON: &str = "my_resources/pulumiio-ar21.svg";
const EXPRESS_ICON: &str = "my_resources/expressjs-icon.svg";
const POSTMAN_ICON: &str = "my_resources/postman.svg";

/// Diagram header: title, output filename and viewer flag.
pub fn header() -> Header {
    Header::new("CSYE6225 Cloud Architecture with CI/CD")
        .with_filename("cloud_architecture_diagram")
        .with_show(false)
}

fn labeled(label: &str) -> Link {
    Link::forward().with_label(label)
}

/// Describes the architecture on `canvas`.
///
/// # Errors
///
/// Only fails if a connection is rejected by the diagram model.
pub fn cloud_architecture(canvas: &mut Canvas) -> Result<(), StratusError> {
    let users = canvas.node("Users", Category::Actor);

    let (github, build_ci, build_ami, packer_check) = canvas.cluster("GitHub", |canvas| {
        let github = canvas.node("Repository", Category::SourceControl);
        let (build_ci, build_ami, packer_check) = canvas.cluster("GitHub Actions", |canvas| {
            Ok((
                canvas.node("Build CI", Category::Pipeline),
                canvas.node("Build AMI", Category::Pipeline),
                canvas.custom("Packer Check", PACKER_ICON),
            ))
        })?;
        Ok((github, build_ci, build_ami, packer_check))
    })?;

    let pulumi = canvas.custom("IaC", PULUMI_ICON);

    let (route53, vpc, lambda_function, dynamodb) = canvas.cluster("AWS Cloud", |canvas| {
        let route53 = canvas.node("Route53", Category::Dns);
        let vpc = canvas.cluster("VPC", |canvas| {
            let vpc = canvas.node("Custom VPC", Category::Network);
            let public_subnets = canvas.cluster("Public Subnets", |canvas| {
                Ok((1..=3)
                    .map(|n| canvas.node(format!("Public Subnet {n}"), Category::Network))
                    .collect::<Vec<_>>())
            })?;
            let private_subnets = canvas.cluster("Private Subnets", |canvas| {
                Ok((1..=3)
                    .map(|n| canvas.node(format!("Private Subnet {n}"), Category::Network))
                    .collect::<Vec<_>>())
            })?;

            let igw = canvas.node("Internet Gateway", Category::Gateway);
            let nat = canvas.node("NAT Gateway", Category::Gateway);
            let elb = canvas.node("Application Load Balancer", Category::LoadBalancer);

            let (asg, ec2_instances) = canvas.cluster("Auto Scaling Group", |canvas| {
                let asg = canvas.node("Auto Scaling", Category::AutoScaling);
                let instances: Vec<_> = (1..=3)
                    .map(|n| canvas.node(format!("EC2 Instance {n}"), Category::Compute))
                    .collect();
                Ok((asg, instances))
            })?;

            Ok(VpcNodes {
                vpc,
                public_subnets,
                private_subnets,
                igw,
                nat,
                elb,
                asg,
                ec2_instances,
                rds: canvas.node("RDS PostgreSQL", Category::Database),
                s3: canvas.node("S3 Bucket", Category::Storage),
                cloudwatch: canvas.node("Cloudwatch", Category::Monitoring),
                iam: canvas.node("IAM", Category::Identity),
                sns: canvas.node("SNS Topic", Category::Topic),
                acm: canvas.node("ACM SSL Certificate", Category::Security),
            })
        })?;

        let lambda_function = canvas.node("Lambda Function", Category::Serverless);
        let dynamodb = canvas.node("Dynamodb", Category::Database);
        Ok((route53, vpc, lambda_function, dynamodb))
    })?;

    let gcs = canvas.cluster("Google Cloud Platform", |canvas| {
        Ok(canvas.node("Google Cloud Storage", Category::Storage))
    })?;

    // Provisioning
    canvas.connect(pulumi, vpc.vpc, labeled("Provision Infrastructure"))?;

    // CI/CD
    canvas.link(github, build_ci)?;
    canvas.link(github, build_ami)?;
    canvas.link(github, packer_check)?;
    for label in [
        "Create AMI",
        "Update Launch Template",
        "Start Instance Refresh",
    ] {
        canvas.connect(build_ami, vpc.asg, labeled(label))?;
    }

    // Request path
    canvas.link(users, route53)?;
    canvas.link(route53, vpc.elb)?;
    canvas.connect(vpc.elb, vpc.asg, labeled("HTTPS"))?;
    canvas.line(vpc.asg, &vpc.ec2_instances)?;
    canvas.connect(&vpc.ec2_instances, vpc.rds, labeled("Read/Write"))?;
    canvas.connect(&vpc.ec2_instances, vpc.s3, labeled("Store/Retrieve"))?;
    canvas.connect(&vpc.ec2_instances, vpc.cloudwatch, labeled("Log"))?;
    canvas.connect(&vpc.ec2_instances, vpc.iam, labeled("Authenticate"))?;
    canvas.link(&vpc.ec2_instances, vpc.sns)?;

    // Notifications
    canvas.link(vpc.sns, lambda_function)?;
    canvas.link(lambda_function, dynamodb)?;
    canvas.link(lambda_function, gcs)?;
    let recipients = canvas.node("Email Recipients", Category::Actor);
    canvas.connect(lambda_function, recipients, labeled("Send Email"))?;

    // Network
    canvas.link(vpc.igw, &vpc.public_subnets)?;
    canvas.link(&vpc.public_subnets, vpc.nat)?;
    canvas.link(vpc.nat, &vpc.private_subnets)?;
    canvas.link(&vpc.private_subnets, vpc.rds)?;

    // Security
    canvas.line(vpc.acm, vpc.elb)?;

    // Application
    canvas.cluster("EC2 Instance", |canvas| {
        let app = canvas.node("Node.js App", Category::Runtime);
        let express = canvas.custom("Express.js", EXPRESS_ICON);

        let (postman, routes) = canvas.cluster("API Routes", |canvas| {
            let postman = canvas.custom("", POSTMAN_ICON);
            let routes: Vec<_> = [
                "GET /",
                "GET /:id",
                "POST /",
                "POST /:id/submissions",
                "DELETE /:id",
                "PUT /:id",
            ]
            .into_iter()
            .map(|route| canvas.custom(route, POSTMAN_ICON))
            .collect();
            Ok((postman, routes))
        })?;

        canvas.link(app, express)?;
        // The plain connectors hang the routes off the Postman icon; the
        // arrows from Express.js land on the routes themselves.
        canvas.line(postman, &routes)?;
        canvas.link(express, &routes)?;

        canvas.connect(app, vpc.rds, labeled("Connect"))?;
        canvas.connect(app, vpc.s3, labeled("Use"))?;
        canvas.connect(app, vpc.sns, labeled("Publish"))?;
        Ok(())
    })
}

/// Handles created inside the VPC cluster that are connected later.
struct VpcNodes {
    vpc: NodeRef,
    public_subnets: Vec<NodeRef>,
    private_subnets: Vec<NodeRef>,
    igw: NodeRef,
    nat: NodeRef,
    elb: NodeRef,
    asg: NodeRef,
    ec2_instances: Vec<NodeRef>,
    rds: NodeRef,
    s3: NodeRef,
    cloudwatch: NodeRef,
    iam: NodeRef,
    sns: NodeRef,
    acm: NodeRef,
}

#[cfg(test)]
mod tests {
    use stratus::{
        DiagramBuilder,
        semantic::{ArrowDirection, Diagram},
        structure::DiagramGraph,
    };

    use super::*;

    fn build() -> Diagram {
        DiagramBuilder::default()
            .build(header(), cloud_architecture)
            .unwrap()
    }

    fn count_edges(diagram: &Diagram, direction: ArrowDirection) -> usize {
        diagram
            .edges()
            .filter(|(_, edge)| edge.direction() == direction)
            .count()
    }

    #[test]
    fn test_header() {
        let header = header();
        assert_eq!(header.title(), "CSYE6225 Cloud Architecture with CI/CD");
        assert_eq!(header.filename(), "cloud_architecture_diagram");
        assert!(!header.show());
    }

    #[test]
    fn test_counts() {
        let diagram = build();

        assert_eq!(diagram.node_count(), 40);
        assert_eq!(diagram.cluster_count(), 10);
        assert_eq!(diagram.edge_count(), 61);
        assert_eq!(count_edges(&diagram, ArrowDirection::Plain), 10);
        assert_eq!(count_edges(&diagram, ArrowDirection::Forward), 51);
    }

    #[test]
    fn test_labels() {
        let diagram = build();
        let labeled = diagram
            .edges()
            .filter_map(|(_, edge)| edge.label())
            .collect::<Vec<_>>();

        assert_eq!(labeled.len(), 21);
        assert_eq!(labeled.iter().filter(|l| **l == "Read/Write").count(), 3);
        assert_eq!(labeled[0], "Provision Infrastructure");
        assert_eq!(labeled.last(), Some(&"Publish"));
    }

    #[test]
    fn test_custom_icons() {
        let diagram = build();
        let postman = diagram
            .nodes()
            .filter(|(_, node)| node.icon() == Some(std::path::Path::new(POSTMAN_ICON)))
            .count();
        let custom = diagram
            .nodes()
            .filter(|(_, node)| node.category() == Category::Custom)
            .count();

        assert_eq!(postman, 7);
        assert_eq!(custom, 10);
    }

    #[test]
    fn test_gateway_fan_out_and_fan_in() {
        let diagram = build();
        let graph = DiagramGraph::from_diagram(&diagram).unwrap();
        let (igw, _) = diagram
            .nodes()
            .find(|(_, node)| node.label() == "Internet Gateway")
            .unwrap();

        let subnets: Vec<_> = graph.successors(igw).map(|node| node.label()).collect();
        assert_eq!(subnets.len(), 3);
        assert!(subnets.iter().all(|label| label.starts_with("Public Subnet")));
    }

    #[test]
    fn test_rebuild_is_isomorphic() {
        let first = DiagramGraph::from_diagram(&build()).unwrap();
        let second = DiagramGraph::from_diagram(&build()).unwrap();
        assert!(first.is_isomorphic(&second));
    }
}
