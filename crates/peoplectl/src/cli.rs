//! Command-line surface and dispatch
//!
//! Every subcommand validates its payload at the edge, calls one service
//! operation and returns the result as JSON.

use clap::{Args, Parser, Subcommand};
use people_core::{
    AddressDraft, AddressId, PersonDraft, PersonId, PersonPatch, Services, Validate,
};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "peoplectl", version, about = "Manage persons and their principal addresses")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Person records
    #[command(subcommand)]
    Person(PersonCommand),
    /// Addresses of a person
    #[command(subcommand)]
    Address(AddressCommand),
}

#[derive(Debug, Subcommand)]
pub enum PersonCommand {
    /// Create a person
    Create {
        #[arg(long)]
        name: String,
        /// Birth date as dd/MM/yyyy
        #[arg(long)]
        birth_date: String,
    },
    /// Overwrite the given fields of a person
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        birth_date: Option<String>,
    },
    /// Show one person
    Get { id: i64 },
    /// List all persons
    List,
}

#[derive(Debug, Subcommand)]
pub enum AddressCommand {
    /// Add an address to a person
    Add {
        person_id: i64,
        #[command(flatten)]
        fields: AddressFields,
    },
    /// List the addresses of a person
    List { person_id: i64 },
    /// Make an address the person's principal one
    SetPrincipal { person_id: i64, address_id: i64 },
    /// Show the person's principal address
    Principal { person_id: i64 },
}

#[derive(Debug, Args)]
pub struct AddressFields {
    #[arg(long)]
    pub street: String,
    #[arg(long)]
    pub postal_code: String,
    #[arg(long)]
    pub number: String,
    #[arg(long)]
    pub city: String,
}

impl From<AddressFields> for AddressDraft {
    fn from(fields: AddressFields) -> Self {
        AddressDraft::new(fields.street, fields.postal_code, fields.number, fields.city)
    }
}

/// Run one command against the services
///
/// # Returns
///
/// - `Ok(Some(value))`: JSON to print
/// - `Ok(None)`: Command succeeded with nothing to print
pub async fn execute(command: Command, services: &Services) -> people_core::Result<Option<Value>> {
    let value = match command {
        Command::Person(PersonCommand::Create { name, birth_date }) => {
            let draft = PersonDraft::new(name, birth_date);
            draft.validate()?;
            serde_json::to_value(services.persons.create(draft).await?)?
        }
        Command::Person(PersonCommand::Update {
            id,
            name,
            birth_date,
        }) => {
            let patch = PersonPatch { name, birth_date };
            patch.validate()?;
            serde_json::to_value(services.persons.update(PersonId(id), patch).await?)?
        }
        Command::Person(PersonCommand::Get { id }) => {
            serde_json::to_value(services.persons.get(PersonId(id)).await?)?
        }
        Command::Person(PersonCommand::List) => {
            serde_json::to_value(services.persons.list_all().await?)?
        }
        Command::Address(AddressCommand::Add { person_id, fields }) => {
            let draft = AddressDraft::from(fields);
            draft.validate()?;
            let address = services
                .addresses
                .add_address(PersonId(person_id), draft)
                .await?;
            serde_json::to_value(address)?
        }
        Command::Address(AddressCommand::List { person_id }) => {
            serde_json::to_value(services.addresses.list_addresses(PersonId(person_id)).await?)?
        }
        Command::Address(AddressCommand::SetPrincipal {
            person_id,
            address_id,
        }) => {
            services
                .addresses
                .set_principal(PersonId(person_id), AddressId(address_id))
                .await?;
            return Ok(None);
        }
        Command::Address(AddressCommand::Principal { person_id }) => {
            serde_json::to_value(services.addresses.get_principal(PersonId(person_id)).await?)?
        }
    };

    Ok(Some(value))
}
