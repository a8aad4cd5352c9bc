// Topology and diagnostics endpoints
//
// Clusters, links, end nodes, ARP entries, forwarding paths, LLDP
// suppression, and the diag/ probe surface. All results come back as
// dynamic records; the field set varies by controller version.

use tracing::debug;

use crate::client::{member_list, FlareClient};
use crate::error::Error;
use crate::record::Record;

impl FlareClient {
    /// List controller clusters.
    ///
    /// `GET /sdn/v2.0/net/clusters`
    pub async fn get_clusters(&self) -> Result<Vec<Record>, Error> {
        let body = self.get(&["net", "clusters"]).await?;
        member_list(body, "clusters")
    }

    /// Get the broadcast tree for a cluster.
    ///
    /// `GET /sdn/v2.0/net/clusters/{cluster_uid}/tree`
    pub async fn get_cluster_tree(&self, cluster_uid: &str) -> Result<Vec<Record>, Error> {
        let body = self
            .get(&["net", "clusters", cluster_uid, "tree"])
            .await?;
        member_list(body, "cluster")
    }

    /// List all links discovered by the controller.
    ///
    /// `GET /sdn/v2.0/net/links`
    pub async fn get_links(&self) -> Result<Vec<Record>, Error> {
        let body = self.get(&["net", "links"]).await?;
        member_list(body, "links")
    }

    /// Get the shortest computed path between two datapaths.
    ///
    /// `GET /sdn/v2.0/paths/forward?src_dpid&dst_dpid`
    pub async fn get_forward_path(
        &self,
        src_dpid: &str,
        dst_dpid: &str,
    ) -> Result<Vec<Record>, Error> {
        let params = [
            ("src_dpid", src_dpid.to_owned()),
            ("dst_dpid", dst_dpid.to_owned()),
        ];
        let body = self
            .get_with_params(&["paths", "forward"], &params)
            .await?;
        member_list(body, "path")
    }

    /// List ARP entries, optionally filtered by VLAN ID and IP address.
    ///
    /// `GET /sdn/v2.0/net/arps[?vid[&ip]]` -- the IP filter only applies
    /// within a VLAN, so `ip` is ignored unless `vid` is given.
    pub async fn get_arps(
        &self,
        vid: Option<&str>,
        ip: Option<&str>,
    ) -> Result<Vec<Record>, Error> {
        let mut params = Vec::new();
        if let Some(vid) = vid {
            params.push(("vid", vid.to_owned()));
            if let Some(ip) = ip {
                params.push(("ip", ip.to_owned()));
            }
        }
        let body = self.get_with_params(&["net", "arps"], &params).await?;
        member_list(body, "arps")
    }

    /// List end nodes.
    ///
    /// Filterable by VLAN ID (optionally narrowed to one IP) or by
    /// datapath ID (optionally narrowed to one port). The two filter
    /// families are mutually exclusive; `vid` wins when both are given.
    ///
    /// `GET /sdn/v2.0/net/nodes[?vid[&ip]|?dpid[&port]]`
    pub async fn get_nodes(
        &self,
        ip: Option<&str>,
        vid: Option<&str>,
        dpid: Option<&str>,
        port: Option<u32>,
    ) -> Result<Vec<Record>, Error> {
        let mut params = Vec::new();
        if let Some(vid) = vid {
            params.push(("vid", vid.to_owned()));
            if let Some(ip) = ip {
                params.push(("ip", ip.to_owned()));
            }
        } else if let Some(dpid) = dpid {
            params.push(("dpid", dpid.to_owned()));
            if let Some(port) = port {
                params.push(("port", port.to_string()));
            }
        }
        let body = self.get_with_params(&["net", "nodes"], &params).await?;
        member_list(body, "nodes")
    }

    // ── LLDP suppression ─────────────────────────────────────────────

    /// List LLDP-suppressed ports.
    ///
    /// `GET /sdn/v2.0/lldp`
    pub async fn get_lldp(&self) -> Result<Vec<Record>, Error> {
        let body = self.get(&["lldp"]).await?;
        member_list(body, "lldp_suppressed")
    }

    /// Put the given ports into the LLDP-suppressed state.
    ///
    /// `POST /sdn/v2.0/lldp`
    pub async fn set_lldp(&self, ports: &Record) -> Result<(), Error> {
        debug!("suppressing LLDP on ports");
        self.post(&["lldp"], ports).await?;
        Ok(())
    }

    /// Remove the given ports from the LLDP-suppressed state.
    ///
    /// `DELETE /sdn/v2.0/lldp`
    pub async fn delete_lldp(&self, ports: &Record) -> Result<(), Error> {
        debug!("unsuppressing LLDP on ports");
        self.delete_with_body(&["lldp"], ports).await?;
        Ok(())
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// List diagnostic observation posts.
    ///
    /// `GET /sdn/v2.0/diag/observations`
    pub async fn get_diag_observations(&self) -> Result<Record, Error> {
        let body = self.get(&["diag", "observations"]).await?;
        Ok(Record::from(body))
    }

    /// Create a diagnostic observation post.
    ///
    /// `POST /sdn/v2.0/diag/observations`
    pub async fn set_diag_observations(&self, observation: &Record) -> Result<(), Error> {
        self.post(&["diag", "observations"], observation).await?;
        Ok(())
    }

    /// Remove a diagnostic observation post.
    ///
    /// `DELETE /sdn/v2.0/diag/observations`
    pub async fn delete_diag_observations(&self, observation: &Record) -> Result<(), Error> {
        self.delete_with_body(&["diag", "observations"], observation)
            .await?;
        Ok(())
    }

    /// List diagnostic probe packets.
    ///
    /// `GET /sdn/v2.0/diag/packets`
    pub async fn get_diag_packets(&self) -> Result<Record, Error> {
        let body = self.get(&["diag", "packets"]).await?;
        Ok(Record::from(body))
    }

    /// Inject a diagnostic probe packet; the response carries its uid.
    ///
    /// `POST /sdn/v2.0/diag/packets`
    pub async fn set_diag_packets(&self, packet: &Record) -> Result<Record, Error> {
        let body = self.post(&["diag", "packets"], packet).await?;
        Ok(Record::from(body))
    }

    /// Get detail for one probe packet.
    ///
    /// `GET /sdn/v2.0/diag/packets/{packet_uid}`
    pub async fn get_diag_packet_detail(&self, packet_uid: &str) -> Result<Record, Error> {
        let body = self.get(&["diag", "packets", packet_uid]).await?;
        Ok(Record::from(body))
    }

    /// Remove a probe packet.
    ///
    /// `DELETE /sdn/v2.0/diag/packets/{packet_uid}`
    pub async fn delete_diag_packet(&self, packet_uid: &str) -> Result<(), Error> {
        self.delete(&["diag", "packets", packet_uid]).await?;
        Ok(())
    }

    /// Get the expected forwarding path of a probe packet.
    ///
    /// `GET /sdn/v2.0/diag/packets/{packet_uid}/path`
    pub async fn get_diag_packet_path(&self, packet_uid: &str) -> Result<Record, Error> {
        let body = self.get(&["diag", "packets", packet_uid, "path"]).await?;
        Ok(Record::from(body))
    }

    /// Get the next hop a probe packet would take.
    ///
    /// `GET /sdn/v2.0/diag/packets/{packet_uid}/nexthop`
    pub async fn get_diag_packet_nexthop(&self, packet_uid: &str) -> Result<Record, Error> {
        let body = self
            .get(&["diag", "packets", packet_uid, "nexthop"])
            .await?;
        Ok(Record::from(body))
    }

    /// Perform an action on a probe packet (e.g. resume at a hop).
    ///
    /// `POST /sdn/v2.0/diag/packets/{packet_uid}/action`
    pub async fn set_diag_packet_action(
        &self,
        packet_uid: &str,
        action: &Record,
    ) -> Result<(), Error> {
        self.post(&["diag", "packets", packet_uid, "action"], action)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::client::member_list;
    use crate::error::Error;

    #[test]
    fn member_list_unwraps_keyed_envelope() {
        let body = json!({"links": [{"src_dpid": "0x1"}, {"src_dpid": "0x2"}]});
        let links = member_list(body, "links").expect("links present");
        assert_eq!(links.len(), 2);
        assert_eq!(links[1].get("src_dpid").expect("field").as_str(), Some("0x2"));
    }

    #[test]
    fn member_list_missing_key_is_field_not_found() {
        let body = json!({"nodes": []});
        match member_list(body, "links") {
            Err(Error::FieldNotFound { field }) => assert_eq!(field, "links"),
            other => panic!("expected FieldNotFound, got: {other:?}"),
        }
    }

    #[test]
    fn member_list_non_array_is_a_deserialization_error() {
        let body = json!({"links": {"src_dpid": "0x1"}});
        assert!(matches!(
            member_list(body, "links"),
            Err(Error::Deserialization { .. })
        ));
    }
}
