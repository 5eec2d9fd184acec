// Example client for the facility location gRPC service
//
// Start the server first:
//   cargo run --features server -- serve
//
// Two fuels are distributed from three candidate centers to five zones.
// Center 1 already exists; centers 2 and 3 cost 500000 and 450000 to open.
// The client exports the first fuel's model, solves it on its own, then
// streams both fuels through a batch request.

use tonic::Request;

pub mod facility_location {
    tonic::include_proto!("facility_location");
}

use facility_location::{
    facility_location_solver_client::FacilityLocationSolverClient, BatchRequest, CostRow, Empty,
    ExportRequest, ProblemInstance, SolutionStatus, SolveRequest, SolveResponse, SolverBackend,
    SolverConfig,
};

fn instance(
    label: &str,
    costs: [[f64; 5]; 3],
    capacities: [f64; 3],
    demands: [f64; 5],
) -> ProblemInstance {
    ProblemInstance {
        label: label.to_string(),
        opening_costs: vec![0.0, 500000.0, 450000.0],
        capacities: capacities.to_vec(),
        demands: demands.to_vec(),
        transport_costs: costs
            .iter()
            .map(|row| CostRow { costs: row.to_vec() })
            .collect(),
        pre_opened: vec![1],
    }
}

fn print_response(response: &SolveResponse) {
    println!("--- {} ({}) ---", response.label, response.solver_name);

    match SolutionStatus::try_from(response.status) {
        Ok(SolutionStatus::Optimal) => {
            let Some(details) = &response.details else {
                println!("optimal, but no details returned");
                return;
            };
            println!("Total cost: {:.2}", details.objective_value);
            println!(
                "  opening {:.2} + transport {:.2}",
                details.opening_cost_total, details.transport_cost_total
            );
            for (i, open) in details.open.iter().enumerate() {
                println!(
                    "  Center {}: {} (ships {:.2})",
                    i + 1,
                    if *open { "open" } else { "closed" },
                    details.center_outbound[i]
                );
            }
            for (i, row) in details.flows.iter().enumerate() {
                for (j, flow) in row.flows.iter().enumerate() {
                    if *flow > 1e-9 {
                        println!("  X{}{} = {:.2}", i + 1, j + 1, flow);
                    }
                }
            }
        }
        Ok(SolutionStatus::Infeasible) => println!("Infeasible: capacity cannot cover demand"),
        Ok(status) => println!("{:?}: {}", status, response.message),
        Err(_) => println!("Unknown status {}", response.status),
    }

    for warning in &response.warnings {
        println!("  warning: {}", warning);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = FacilityLocationSolverClient::connect("http://127.0.0.1:50051").await?;

    let solvers = client
        .get_available_solvers(Request::new(Empty {}))
        .await?
        .into_inner()
        .solvers;
    println!("Available solvers:");
    for solver in &solvers {
        println!("  {} (MIP: {})", solver.name, solver.supports_mip);
    }

    let fuel_a = instance(
        "fuel-a",
        [
            [60.0, 65.0, 78.0, 67.0, 84.0],
            [45.0, 54.0, 76.0, 53.0, 32.0],
            [31.0, 43.0, 54.0, 65.0, 72.0],
        ],
        [50.0, 75.0, 85.0],
        [16.0, 20.0, 12.0, 18.0, 14.0],
    );
    let fuel_b = instance(
        "fuel-b",
        [
            [37.0, 39.0, 54.0, 45.0, 25.0],
            [23.0, 34.0, 21.0, 34.0, 70.0],
            [21.0, 38.0, 45.0, 38.0, 68.0],
        ],
        [30.0, 60.0, 50.0],
        [10.0, 14.0, 12.0, 16.0, 8.0],
    );

    println!("\n=== LINDO model for fuel-a ===\n");
    let exported = client
        .export(Request::new(ExportRequest {
            instance: Some(fuel_a.clone()),
            override_pre_opened: false,
            pre_opened_override: Vec::new(),
        }))
        .await?
        .into_inner();
    println!("{}", exported.text);

    let config = SolverConfig {
        backend: SolverBackend::Auto as i32,
        time_limit: Some(60.0),
        verbose: false,
        options: Default::default(),
    };

    println!("=== Single solve ===\n");
    let response = client
        .solve(Request::new(SolveRequest {
            instance: Some(fuel_a.clone()),
            solver_config: Some(config.clone()),
        }))
        .await?
        .into_inner();
    print_response(&response);

    println!("\n=== Batch solve (streamed) ===\n");
    let mut stream = client
        .solve_batch(Request::new(BatchRequest {
            instances: vec![fuel_a, fuel_b],
            solver_config: Some(config),
        }))
        .await?
        .into_inner();

    let mut combined = 0.0;
    while let Some(response) = stream.message().await? {
        println!("[instance #{}]", response.index);
        print_response(&response);
        if let Some(details) = &response.details {
            combined += details.objective_value;
        }
        println!();
    }
    println!("Combined cost: {:.2}", combined);

    Ok(())
}
