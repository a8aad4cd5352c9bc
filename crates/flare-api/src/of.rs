// OpenFlow endpoints
//
// Datapaths, ports, flows, groups, meters, and their statistics, all
// under `of/`. Flow/group/meter payloads are passed and returned as
// dynamic records: their shape depends on the OpenFlow protocol version
// the datapath negotiated, so there is no fixed struct to give them.

use serde_json::json;
use tracing::debug;

use crate::client::{member, member_list, FlareClient};
use crate::error::Error;
use crate::record::Record;

impl FlareClient {
    // ── Statistics ───────────────────────────────────────────────────

    /// List statistics for every controller in this controller's team.
    ///
    /// `GET /sdn/v2.0/of/stats`
    pub async fn get_stats(&self) -> Result<Vec<Record>, Error> {
        let body = self.get(&["of", "stats"]).await?;
        member_list(body, "controller_stats")
    }

    /// List port statistics for a datapath, or one port of it.
    ///
    /// `GET /sdn/v2.0/of/stats/ports?dpid[&port_id]`
    pub async fn get_port_stats(
        &self,
        dpid: &str,
        port_id: Option<u32>,
    ) -> Result<Vec<Record>, Error> {
        let mut params = vec![("dpid", dpid.to_owned())];
        if let Some(port_id) = port_id {
            params.push(("port_id", port_id.to_string()));
        }
        let body = self
            .get_with_params(&["of", "stats", "ports"], &params)
            .await?;
        member_list(body, "stats")
    }

    /// List group statistics for a datapath, or one group of it.
    ///
    /// `GET /sdn/v2.0/of/stats/groups?dpid[&group_id]`
    pub async fn get_group_stats(
        &self,
        dpid: &str,
        group_id: Option<u32>,
    ) -> Result<Record, Error> {
        let mut params = vec![("dpid", dpid.to_owned())];
        if let Some(group_id) = group_id {
            params.push(("group_id", group_id.to_string()));
        }
        let body = self
            .get_with_params(&["of", "stats", "groups"], &params)
            .await?;
        Ok(Record::from(body))
    }

    /// List meter statistics for one meter on a datapath.
    ///
    /// `GET /sdn/v2.0/of/stats/meters?dpid&meter`
    pub async fn get_meter_stats(&self, dpid: &str, meter_id: u32) -> Result<Record, Error> {
        let params = [("dpid", dpid.to_owned()), ("meter", meter_id.to_string())];
        let body = self
            .get_with_params(&["of", "stats", "meters"], &params)
            .await?;
        Ok(Record::from(body))
    }

    // ── Datapaths ────────────────────────────────────────────────────

    /// List all datapaths managed by this controller.
    ///
    /// `GET /sdn/v2.0/of/datapaths`
    pub async fn get_datapaths(&self) -> Result<Vec<Record>, Error> {
        let body = self.get(&["of", "datapaths"]).await?;
        member_list(body, "datapaths")
    }

    /// Get detail information on a datapath.
    ///
    /// `GET /sdn/v2.0/of/datapaths/{dpid}`
    pub async fn get_datapath_detail(&self, dpid: &str) -> Result<Record, Error> {
        let body = self.get(&["of", "datapaths", dpid]).await?;
        member(body, "datapath")
    }

    /// Get a datapath's meter features.
    ///
    /// `GET /sdn/v2.0/of/datapaths/{dpid}/features/meter`
    pub async fn get_datapath_meter_features(&self, dpid: &str) -> Result<Record, Error> {
        let body = self
            .get(&["of", "datapaths", dpid, "features", "meter"])
            .await?;
        member(body, "meter_features")
    }

    /// Get a datapath's group features.
    ///
    /// `GET /sdn/v2.0/of/datapaths/{dpid}/features/groups`
    pub async fn get_datapath_group_features(&self, dpid: &str) -> Result<Record, Error> {
        let body = self
            .get(&["of", "datapaths", dpid, "features", "groups"])
            .await?;
        member(body, "group_features")
    }

    // ── Ports ────────────────────────────────────────────────────────

    /// List the ports of a datapath.
    ///
    /// `GET /sdn/v2.0/of/datapaths/{dpid}/ports`
    pub async fn get_ports(&self, dpid: &str) -> Result<Vec<Record>, Error> {
        let body = self.get(&["of", "datapaths", dpid, "ports"]).await?;
        member_list(body, "ports")
    }

    /// Get detailed information for one port.
    ///
    /// `GET /sdn/v2.0/of/datapaths/{dpid}/ports/{port_id}`
    pub async fn get_port_detail(&self, dpid: &str, port_id: u32) -> Result<Record, Error> {
        let port_id = port_id.to_string();
        let body = self
            .get(&["of", "datapaths", dpid, "ports", &port_id])
            .await?;
        member(body, "port")
    }

    // ── Meters ───────────────────────────────────────────────────────

    /// List all meters configured on a datapath.
    ///
    /// `GET /sdn/v2.0/of/datapaths/{dpid}/meters`
    pub async fn get_meters(&self, dpid: &str) -> Result<Record, Error> {
        let body = self.get(&["of", "datapaths", dpid, "meters"]).await?;
        Ok(Record::from(body))
    }

    /// Add a meter to a datapath.
    ///
    /// `POST /sdn/v2.0/of/datapaths/{dpid}/meters`
    pub async fn add_meter(&self, dpid: &str, meter: &Record) -> Result<(), Error> {
        debug!(dpid, "adding meter");
        self.post(&["of", "datapaths", dpid, "meters"], meter)
            .await?;
        Ok(())
    }

    /// Get detailed meter information.
    ///
    /// `GET /sdn/v2.0/of/datapaths/{dpid}/meters/{meter_id}`
    pub async fn get_meter_details(&self, dpid: &str, meter_id: u32) -> Result<Record, Error> {
        let meter_id = meter_id.to_string();
        let body = self
            .get(&["of", "datapaths", dpid, "meters", &meter_id])
            .await?;
        Ok(Record::from(body))
    }

    /// Update a meter.
    ///
    /// `PUT /sdn/v2.0/of/datapaths/{dpid}/meters/{meter_id}`
    pub async fn update_meter(
        &self,
        dpid: &str,
        meter_id: u32,
        meter: &Record,
    ) -> Result<(), Error> {
        debug!(dpid, meter_id, "updating meter");
        let meter_id = meter_id.to_string();
        self.put(&["of", "datapaths", dpid, "meters", &meter_id], meter)
            .await?;
        Ok(())
    }

    /// Delete a meter.
    ///
    /// `DELETE /sdn/v2.0/of/datapaths/{dpid}/meters/{meter_id}`
    pub async fn delete_meter(&self, dpid: &str, meter_id: u32) -> Result<(), Error> {
        debug!(dpid, meter_id, "deleting meter");
        let meter_id = meter_id.to_string();
        self.delete(&["of", "datapaths", dpid, "meters", &meter_id])
            .await?;
        Ok(())
    }

    // ── Flows ────────────────────────────────────────────────────────

    /// List the flows installed on a datapath.
    ///
    /// `GET /sdn/v2.0/of/datapaths/{dpid}/flows`
    pub async fn get_flows(&self, dpid: &str) -> Result<Vec<Record>, Error> {
        let body = self.get(&["of", "datapaths", dpid, "flows"]).await?;
        member_list(body, "flows")
    }

    /// Install a single flow on a datapath.
    ///
    /// `POST /sdn/v2.0/of/datapaths/{dpid}/flows` with `{"flow": ...}`
    pub async fn add_flow(&self, dpid: &str, flow: &Record) -> Result<(), Error> {
        debug!(dpid, "adding flow");
        self.post(&["of", "datapaths", dpid, "flows"], &json!({ "flow": flow }))
            .await?;
        Ok(())
    }

    /// Install multiple flows on a datapath.
    ///
    /// `POST /sdn/v2.0/of/datapaths/{dpid}/flows` with `{"flows": [...]}`
    pub async fn add_flows(&self, dpid: &str, flows: &[Record]) -> Result<(), Error> {
        debug!(dpid, count = flows.len(), "adding flows");
        self.post(&["of", "datapaths", dpid, "flows"], &json!({ "flows": flows }))
            .await?;
        Ok(())
    }

    /// Update a single flow on a datapath.
    ///
    /// `PUT /sdn/v2.0/of/datapaths/{dpid}/flows` with `{"flow": ...}`
    pub async fn update_flow(&self, dpid: &str, flow: &Record) -> Result<(), Error> {
        debug!(dpid, "updating flow");
        self.put(&["of", "datapaths", dpid, "flows"], &json!({ "flow": flow }))
            .await?;
        Ok(())
    }

    /// Update multiple flows on a datapath.
    ///
    /// `PUT /sdn/v2.0/of/datapaths/{dpid}/flows` with `{"flows": [...]}`
    pub async fn update_flows(&self, dpid: &str, flows: &[Record]) -> Result<(), Error> {
        debug!(dpid, count = flows.len(), "updating flows");
        self.put(&["of", "datapaths", dpid, "flows"], &json!({ "flows": flows }))
            .await?;
        Ok(())
    }

    /// Remove a single flow from a datapath.
    ///
    /// `DELETE /sdn/v2.0/of/datapaths/{dpid}/flows` with `{"flow": ...}`
    pub async fn delete_flow(&self, dpid: &str, flow: &Record) -> Result<(), Error> {
        debug!(dpid, "deleting flow");
        self.delete_with_body(&["of", "datapaths", dpid, "flows"], &json!({ "flow": flow }))
            .await?;
        Ok(())
    }

    /// Remove multiple flows from a datapath.
    ///
    /// `DELETE /sdn/v2.0/of/datapaths/{dpid}/flows` with `{"flows": [...]}`
    pub async fn delete_flows(&self, dpid: &str, flows: &[Record]) -> Result<(), Error> {
        debug!(dpid, count = flows.len(), "deleting flows");
        self.delete_with_body(
            &["of", "datapaths", dpid, "flows"],
            &json!({ "flows": flows }),
        )
        .await?;
        Ok(())
    }

    // ── Groups ───────────────────────────────────────────────────────

    /// List the groups created on a datapath.
    ///
    /// `GET /sdn/v2.0/of/datapaths/{dpid}/groups`
    pub async fn get_groups(&self, dpid: &str) -> Result<Record, Error> {
        let body = self.get(&["of", "datapaths", dpid, "groups"]).await?;
        Ok(Record::from(body))
    }

    /// Create a group on a datapath.
    ///
    /// `POST /sdn/v2.0/of/datapaths/{dpid}/groups`
    pub async fn add_group(&self, dpid: &str, group: &Record) -> Result<(), Error> {
        debug!(dpid, "adding group");
        self.post(&["of", "datapaths", dpid, "groups"], group)
            .await?;
        Ok(())
    }

    /// Get details for one group.
    ///
    /// `GET /sdn/v2.0/of/datapaths/{dpid}/groups/{group_id}`
    pub async fn get_group_details(&self, dpid: &str, group_id: u32) -> Result<Record, Error> {
        let group_id = group_id.to_string();
        let body = self
            .get(&["of", "datapaths", dpid, "groups", &group_id])
            .await?;
        Ok(Record::from(body))
    }

    /// Update a group.
    ///
    /// `PUT /sdn/v2.0/of/datapaths/{dpid}/groups/{group_id}`
    pub async fn update_group(
        &self,
        dpid: &str,
        group_id: u32,
        group: &Record,
    ) -> Result<(), Error> {
        debug!(dpid, group_id, "updating group");
        let group_id = group_id.to_string();
        self.put(&["of", "datapaths", dpid, "groups", &group_id], group)
            .await?;
        Ok(())
    }

    /// Delete a group.
    ///
    /// `DELETE /sdn/v2.0/of/datapaths/{dpid}/groups/{group_id}`
    pub async fn delete_group(&self, dpid: &str, group_id: u32) -> Result<(), Error> {
        debug!(dpid, group_id, "deleting group");
        let group_id = group_id.to_string();
        self.delete(&["of", "datapaths", dpid, "groups", &group_id])
            .await?;
        Ok(())
    }
}
